//! Golden test vectors for the invite code wire format.
//!
//! Any implementation sharing a secret with this one must produce exactly
//! these codes from these inputs, byte for byte.

use pasu_invite_core::{FixedClock, InviteCode, InviteCodeService, SecretKey};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// HMAC secret, as UTF-8.
    pub secret: &'static str,
    /// Email as the caller passed it (before canonicalization).
    pub email: &'static str,
    /// Issuance time (Unix ms).
    pub issued_at: i64,
    pub validity_days: u32,
    /// Signed payload, as text.
    pub expected_payload: &'static str,
    /// HMAC-SHA256 tag (hex).
    pub expected_signature: &'static str,
    /// Full wire form.
    pub expected_code: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "partner seven days",
            secret: "pasu-golden-secret-v1",
            email: "partner@example.com",
            issued_at: 1_766_620_800_000, // 2025-12-25T00:00:00Z
            validity_days: 7,
            expected_payload: "partner@example.com|1767225600000",
            expected_signature: "79103204642131ff9518dd24a6d3f4fcdbea6d8f676f025b144b6f23c2611c25",
            expected_code: "PASU-cGFydG5lckBleGFtcGxlLmNvbXwxNzY3MjI1NjAwMDAw::eRAyBGQhMf-VGN0kptP0_NvqbY9nbwJbFEtvI8JhHCU",
        },
        GoldenVector {
            name: "mixed case email with whitespace",
            secret: "pasu-golden-secret-v1",
            email: "  Ops.Lead@Wellness.EXAMPLE ",
            issued_at: 1_767_225_600_000, // 2026-01-01T00:00:00Z
            validity_days: 7,
            expected_payload: "ops.lead@wellness.example|1767830400000",
            expected_signature: "3d7064ab6a35d662fd81787b30503b9a2dce1ff5b8f71145fe5aef1c7bbd592b",
            expected_code: "PASU-b3BzLmxlYWRAd2VsbG5lc3MuZXhhbXBsZXwxNzY3ODMwNDAwMDAw::PXBkq2o11mL9gXh7MFA7mi3OH_W49xFF_lrvHHu9WSs",
        },
        GoldenVector {
            name: "plus address at max validity",
            secret: "another-secret-with-more-entropy-0123456789",
            email: "HR+Benefits@ACME.example",
            issued_at: 1_792_224_000_000,
            validity_days: 90,
            expected_payload: "hr+benefits@acme.example|1800000000000",
            expected_signature: "0325331a97445a1ccee572bb7f703f620fae24bde08cad96596237180d624888",
            expected_code: "PASU-aHIrYmVuZWZpdHNAYWNtZS5leGFtcGxlfDE4MDAwMDAwMDAwMDA::AyUzGpdEWhzO5XK7f3A_Yg-uJL3gjK2WWWI3GA1iSIg",
        },
        GoldenVector {
            name: "one byte secret at epoch",
            secret: "k",
            email: "a@b.co",
            issued_at: 0,
            validity_days: 1,
            expected_payload: "a@b.co|86400000",
            expected_signature: "d944c0a6f2ed98e9fa6dcb9531e919de98834ba5c278e395814bbc108e08a45e",
            expected_code: "PASU-YUBiLmNvfDg2NDAwMDAw::2UTApvLtmOn6bcuVMekZ3piDS6XCeOOVgUu8EI4IpF4",
        },
    ]
}

/// Build the service a vector was generated with, pinned to its issuance time.
pub fn service_for_vector(vector: &GoldenVector) -> InviteCodeService<FixedClock> {
    let secret = SecretKey::new(vector.secret.as_bytes().to_vec()).expect("vector secret");
    InviteCodeService::with_clock(&secret, FixedClock(vector.issued_at)).expect("vector service")
}

/// Issue the code described by a golden vector.
pub fn issue_from_vector(vector: &GoldenVector) -> InviteCode {
    service_for_vector(vector).issue_at(vector.email, vector.validity_days, vector.issued_at)
}

/// Check every vector, returning `(name, matches, actual_code)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let code = issue_from_vector(v);
            let wire = code.to_string();
            let matches = wire == v.expected_code
                && code.payload() == v.expected_payload.as_bytes()
                && hex::encode(code.signature().as_bytes()) == v.expected_signature;
            (v.name.to_string(), matches, wire)
        })
        .collect()
}
