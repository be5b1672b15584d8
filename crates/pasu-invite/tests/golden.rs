//! Golden test vectors for cross-implementation verification.
//!
//! Every service holding the same secret must produce identical:
//! - payload bytes (`email|expires_at`)
//! - HMAC-SHA256 tag
//! - wire code (`PASU-<payload>::<tag>`, URL-safe base64 without padding)

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;

use pasu_invite::core::{
    payload_bytes, CODE_PREFIX, DAY_MILLIS, PAYLOAD_DELIMITER, SIGNATURE_DELIMITER,
};
use pasu_invite::store::{MemoryStore, NewApplication};
use pasu_invite::{
    inspect, FixedClock, InviteCodeService, InviteError, InvitePortal, PortalConfig, SecretKey,
    TracingNotifier,
};

const SECRET: &[u8] = b"pasu-golden-secret-v1";
const ISSUED_AT: i64 = 1_766_620_800_000; // 2025-12-25T00:00:00Z
const EXPIRES_AT: i64 = 1_767_225_600_000;
const EMAIL: &str = "partner@example.com";
const CODE: &str = "PASU-cGFydG5lckBleGFtcGxlLmNvbXwxNzY3MjI1NjAwMDAw::eRAyBGQhMf-VGN0kptP0_NvqbY9nbwJbFEtvI8JhHCU";

fn service() -> InviteCodeService<FixedClock> {
    let secret = SecretKey::new(SECRET.to_vec()).unwrap();
    InviteCodeService::with_clock(&secret, FixedClock(ISSUED_AT)).unwrap()
}

/// Reassemble a code from raw segments, signed or not.
fn assemble(payload: &[u8], signature: &[u8]) -> String {
    format!(
        "{CODE_PREFIX}-{}{SIGNATURE_DELIMITER}{}",
        URL_SAFE_NO_PAD.encode(payload),
        URL_SAFE_NO_PAD.encode(signature)
    )
}

fn signature_of(code: &str) -> Vec<u8> {
    let (_, sig) = code.split_once(SIGNATURE_DELIMITER).unwrap();
    URL_SAFE_NO_PAD.decode(sig).unwrap()
}

#[test]
fn test_wire_constants() {
    assert_eq!(CODE_PREFIX, "PASU");
    assert_eq!(SIGNATURE_DELIMITER, "::");
    assert_eq!(PAYLOAD_DELIMITER, b'|');
    assert_eq!(DAY_MILLIS, 86_400_000);
}

#[test]
fn test_issue_exact_code() {
    let code = service().issue_at(EMAIL, 7, ISSUED_AT);
    assert_eq!(code.to_string(), CODE);
    assert_eq!(code.payload(), b"partner@example.com|1767225600000");
    assert_eq!(
        hex::encode(code.signature().as_bytes()),
        "79103204642131ff9518dd24a6d3f4fcdbea6d8f676f025b144b6f23c2611c25"
    );
}

#[test]
fn test_issue_canonicalizes_email() {
    let code = service().issue_at("  Ops.Lead@Wellness.EXAMPLE ", 7, 1_767_225_600_000);
    assert_eq!(
        code.to_string(),
        "PASU-b3BzLmxlYWRAd2VsbG5lc3MuZXhhbXBsZXwxNzY3ODMwNDAwMDAw::PXBkq2o11mL9gXh7MFA7mi3OH_W49xFF_lrvHHu9WSs"
    );
}

#[test]
fn test_verify_golden_code() {
    let claims = service().verify(CODE, EMAIL).unwrap();
    assert_eq!(claims.email, EMAIL);
    assert_eq!(claims.expires_at, EXPIRES_AT);

    // Prefix is optional and case-insensitive; surrounding whitespace is ignored.
    let bare = CODE.strip_prefix("PASU-").unwrap();
    assert!(service().verify(bare, EMAIL).is_ok());
    assert!(service().verify(&format!(" pasu-{bare}\n"), EMAIL).is_ok());
}

#[test]
fn test_expiry_boundary() {
    let svc = service();
    assert!(svc.verify_at(CODE, EMAIL, EXPIRES_AT).is_ok());
    assert_eq!(
        svc.verify_at(CODE, EMAIL, EXPIRES_AT + 1),
        Err(InviteError::Expired)
    );
}

#[test]
fn test_inspect_golden_code() {
    let claims = inspect(CODE).unwrap();
    assert_eq!(claims.email, EMAIL);
    assert_eq!(claims.expires_at, EXPIRES_AT);
}

#[test]
fn print_golden_code_json() {
    #[derive(Serialize)]
    struct VectorFile<'a> {
        prefix: &'a str,
        secret: String,
        email: &'a str,
        issued_at: i64,
        validity_days: u32,
        code: &'a str,
        claims: pasu_invite::InviteClaims,
    }

    let file = VectorFile {
        prefix: CODE_PREFIX,
        secret: String::from_utf8_lossy(SECRET).to_string(),
        email: EMAIL,
        issued_at: ISSUED_AT,
        validity_days: 7,
        code: CODE,
        claims: inspect(CODE).unwrap(),
    };

    let json = serde_json::to_string_pretty(&file).unwrap();
    println!("{}", json);
}

// =============================================================================
// REJECTION TEST VECTORS
// =============================================================================

#[test]
fn test_reject_missing_delimiter() {
    let body = CODE.replace(SIGNATURE_DELIMITER, "");
    assert_eq!(service().verify(&body, EMAIL), Err(InviteError::MalformedCode));
    assert_eq!(inspect(&body), None);
}

#[test]
fn test_reject_three_segments() {
    let code = format!("{CODE}{SIGNATURE_DELIMITER}AAAA");
    assert_eq!(service().verify(&code, EMAIL), Err(InviteError::MalformedCode));
}

#[test]
fn test_reject_bad_payload_base64() {
    let code = "PASU-not*base64::eRAyBGQhMf-VGN0kptP0_NvqbY9nbwJbFEtvI8JhHCU";
    assert_eq!(service().verify(code, EMAIL), Err(InviteError::MalformedCode));
}

#[test]
fn test_reject_padded_base64() {
    // Standard alphabet with padding is not the wire encoding.
    let payload = b"ab@c.co|86400000";
    let padded = format!(
        "PASU-{}::{}",
        base64::engine::general_purpose::STANDARD.encode(payload),
        URL_SAFE_NO_PAD.encode(hmac_for(payload))
    );
    assert!(padded.contains('='));
    assert_eq!(service().verify(&padded, "ab@c.co"), Err(InviteError::MalformedCode));
}

#[test]
fn test_reject_payload_without_field_delimiter() {
    let code = assemble(b"partner@example.com1767225600000", &[0u8; 32]);
    assert_eq!(service().verify(&code, EMAIL), Err(InviteError::MalformedCode));
}

#[test]
fn test_reject_tampered_signature() {
    let mut sig = signature_of(CODE);
    sig[0] ^= 0x01;
    let code = assemble(&payload_bytes(EMAIL, EXPIRES_AT), &sig);
    assert_eq!(service().verify(&code, EMAIL), Err(InviteError::InvalidSignature));
}

#[test]
fn test_reject_truncated_signature() {
    let sig = signature_of(CODE);
    let code = assemble(&payload_bytes(EMAIL, EXPIRES_AT), &sig[..31]);
    assert_eq!(service().verify(&code, EMAIL), Err(InviteError::InvalidSignature));
}

#[test]
fn test_reject_extended_expiry() {
    // Original tag over a payload with the expiry pushed out by a week.
    let later = EXPIRES_AT + 7 * DAY_MILLIS;
    let code = assemble(&payload_bytes(EMAIL, later), &signature_of(CODE));
    assert_eq!(service().verify(&code, EMAIL), Err(InviteError::InvalidSignature));
    // Display decoding still shows the forged expiry.
    assert_eq!(inspect(&code).unwrap().expires_at, later);
}

#[test]
fn test_reject_swapped_email() {
    let code = assemble(&payload_bytes("attacker@example.com", EXPIRES_AT), &signature_of(CODE));
    assert_eq!(
        service().verify(&code, "attacker@example.com"),
        Err(InviteError::InvalidSignature)
    );
}

#[test]
fn test_reject_other_secret() {
    let other = InviteCodeService::with_clock(
        &SecretKey::new(b"pasu-golden-secret-v2".to_vec()).unwrap(),
        FixedClock(ISSUED_AT),
    )
    .unwrap();
    assert_eq!(other.verify(CODE, EMAIL), Err(InviteError::InvalidSignature));
}

#[test]
fn test_reject_wrong_email() {
    assert_eq!(
        service().verify(CODE, "someone@example.com"),
        Err(InviteError::EmailMismatch)
    );
}

#[test]
fn test_reject_non_integer_expiry() {
    // Correctly signed, so only the expiry parse can fail.
    let payload = b"partner@example.com|soon";
    let code = assemble(payload, &hmac_for(payload));
    assert_eq!(service().verify(&code, EMAIL), Err(InviteError::MalformedCode));
}

fn hmac_for(payload: &[u8]) -> Vec<u8> {
    use pasu_invite::core::InviteSigner;
    InviteSigner::new(&SecretKey::new(SECRET.to_vec()).unwrap())
        .unwrap()
        .sign(payload)
        .as_bytes()
        .to_vec()
}

// =============================================================================
// PORTAL ROUND TRIP
// =============================================================================

#[tokio::test]
async fn test_portal_issues_golden_code() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let config = PortalConfig::new(SecretKey::new(SECRET.to_vec()).unwrap());
    let portal = InvitePortal::with_clock(
        &config,
        MemoryStore::new(),
        TracingNotifier,
        FixedClock(ISSUED_AT),
    )
    .unwrap();

    let id = portal
        .submit(NewApplication::new(EMAIL, "Example Partners", "Robin Park"))
        .await
        .unwrap();
    let issued = portal.approve(id, Some(7)).await.unwrap();
    assert_eq!(issued.code, CODE);
    assert!(issued.delivered);

    let signup = portal.redeem("PARTNER@example.com", CODE).await.unwrap();
    assert_eq!(signup.application_id, id);
}
