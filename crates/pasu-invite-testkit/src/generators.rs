//! Proptest generators for property-based testing.

use proptest::prelude::*;

use pasu_invite::ValidityPolicy;

/// Generate a plausible email address (never contains `|` or whitespace).
pub fn email() -> impl Strategy<Value = String> {
    (
        "[a-z0-9][a-z0-9._+-]{0,23}",
        "[a-z0-9][a-z0-9-]{0,15}",
        "[a-z]{2,6}",
    )
        .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
}

/// Randomly upper-case characters of `s`.
pub fn mixed_case(s: String) -> impl Strategy<Value = String> {
    let len = s.chars().count();
    prop::collection::vec(any::<bool>(), len).prop_map(move |flips| {
        s.chars()
            .zip(flips)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

/// Generate a day count inside the portal's validity window.
pub fn validity_days() -> impl Strategy<Value = u32> {
    ValidityPolicy::MIN_DAYS..=ValidityPolicy::MAX_DAYS
}

/// Generate an issuance timestamp between 2020 and 2100.
pub fn timestamp() -> impl Strategy<Value = i64> {
    1_577_836_800_000i64..4_102_444_800_000i64
}
