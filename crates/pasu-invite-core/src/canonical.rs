//! Canonical payload and wire encoding for invite codes.
//!
//! ```text
//! PASU-<base64url(payload)>::<base64url(signature)>
//! payload = "<lowercased-trimmed-email>|<expiryEpochMillis>"
//! ```
//!
//! Base64 is the URL-safe alphabet without padding, so neither `::` nor `|`
//! can occur inside an encoded segment. The payload delimiter `|` is not
//! escaped: emails containing `|` produce codes that fail to parse, and
//! callers must reject such addresses before issuing.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::crypto::InviteSignature;
use crate::error::InviteError;

/// Brand tag in front of every code. Stripped case-insensitively on parse.
pub const CODE_PREFIX: &str = "PASU";

/// Separator between the brand tag and the encoded body.
pub const PREFIX_SEPARATOR: char = '-';

/// Separator between the encoded payload and the encoded signature.
pub const SIGNATURE_DELIMITER: &str = "::";

/// Separator between the email and the expiry inside the decoded payload.
pub const PAYLOAD_DELIMITER: u8 = b'|';

/// One day in milliseconds.
pub const DAY_MILLIS: i64 = 86_400_000;

/// Lowercase and trim an email address.
pub fn canonical_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Build the signed payload bytes for an already-canonical email.
pub fn payload_bytes(email: &str, expires_at: i64) -> Vec<u8> {
    let expiry = expires_at.to_string();
    let mut out = Vec::with_capacity(email.len() + 1 + expiry.len());
    out.extend_from_slice(email.as_bytes());
    out.push(PAYLOAD_DELIMITER);
    out.extend_from_slice(expiry.as_bytes());
    out
}

/// Render the wire form from payload bytes and their signature.
pub fn encode_code(payload: &[u8], signature: &InviteSignature) -> String {
    format!(
        "{CODE_PREFIX}{PREFIX_SEPARATOR}{}{SIGNATURE_DELIMITER}{}",
        URL_SAFE_NO_PAD.encode(payload),
        URL_SAFE_NO_PAD.encode(signature.as_bytes())
    )
}

/// Trim whitespace and drop the brand prefix if present, in any case.
pub fn strip_prefix(code: &str) -> &str {
    let trimmed = code.trim();
    let bytes = trimmed.as_bytes();
    let tag_len = CODE_PREFIX.len() + 1;
    // Compared as bytes: the tag is ASCII, so a match ends on a char boundary.
    let tagged = bytes.len() >= tag_len
        && bytes[..CODE_PREFIX.len()].eq_ignore_ascii_case(CODE_PREFIX.as_bytes())
        && bytes[CODE_PREFIX.len()] == PREFIX_SEPARATOR as u8;
    if tagged {
        trimmed[tag_len..].trim()
    } else {
        trimmed
    }
}

/// The form a code is stored and compared in: trimmed, with an upper-case tag.
pub fn normalize_code(code: &str) -> String {
    format!("{CODE_PREFIX}{PREFIX_SEPARATOR}{}", strip_prefix(code))
}

/// Split a prefix-stripped body into `(payload, signature)` segments.
///
/// Exactly two segments are required.
pub fn split_code(body: &str) -> Result<(&str, &str), InviteError> {
    let mut parts = body.split(SIGNATURE_DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(payload), Some(signature), None) => Ok((payload, signature)),
        _ => Err(InviteError::MalformedCode),
    }
}

/// Decode one URL-safe, unpadded base64 segment.
pub fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(segment).ok()
}

/// Split decoded payload bytes into `(email, expiry)` text fields.
///
/// Exactly two non-empty UTF-8 fields are required.
pub fn split_payload(payload: &[u8]) -> Result<(&str, &str), InviteError> {
    let mut fields = payload.split(|b| *b == PAYLOAD_DELIMITER);
    let (email, expiry) = match (fields.next(), fields.next(), fields.next()) {
        (Some(email), Some(expiry), None) => (email, expiry),
        _ => return Err(InviteError::MalformedCode),
    };
    if email.is_empty() || expiry.is_empty() {
        return Err(InviteError::MalformedCode);
    }
    let email = std::str::from_utf8(email).map_err(|_| InviteError::MalformedCode)?;
    let expiry = std::str::from_utf8(expiry).map_err(|_| InviteError::MalformedCode)?;
    Ok((email, expiry))
}

/// Parse the expiry field as integer epoch milliseconds.
pub fn parse_expiry(expiry: &str) -> Result<i64, InviteError> {
    expiry.parse::<i64>().map_err(|_| InviteError::MalformedCode)
}
