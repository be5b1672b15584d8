//! Value types carried by invite codes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::{
    decode_segment, encode_code, parse_expiry, payload_bytes, split_code, split_payload,
    strip_prefix,
};
use crate::crypto::InviteSignature;
use crate::error::InviteError;

/// The `(email, expires_at)` pair a code is bound to.
///
/// Returned by `verify` after the signature checks out, and by `inspect`
/// without any check at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InviteClaims {
    /// Canonical (lowercased, trimmed) email.
    pub email: String,
    /// Unix milliseconds after which the code is rejected.
    pub expires_at: i64,
}

impl InviteClaims {
    /// Whether the code is expired at `now`. The expiry instant itself is still valid.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// A freshly issued invite code.
///
/// Never stored in this structured form; persist [`InviteCode::to_string`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteCode {
    pub(crate) email: String,
    pub(crate) expires_at: i64,
    pub(crate) signature: InviteSignature,
}

impl InviteCode {
    /// Decode a wire code into its parts.
    ///
    /// Structural only: the signature is carried along, not checked.
    pub fn parse(code: &str) -> Result<Self, InviteError> {
        let (encoded_payload, encoded_signature) = split_code(strip_prefix(code))?;
        let payload = decode_segment(encoded_payload).ok_or(InviteError::MalformedCode)?;
        let (email, expiry) = split_payload(&payload)?;
        let tag: [u8; 32] = decode_segment(encoded_signature)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(InviteError::MalformedCode)?;
        Ok(Self {
            email: email.to_string(),
            expires_at: parse_expiry(expiry)?,
            signature: InviteSignature::from_bytes(tag),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn signature(&self) -> &InviteSignature {
        &self.signature
    }

    /// The exact bytes the signature covers.
    pub fn payload(&self) -> Vec<u8> {
        payload_bytes(&self.email, self.expires_at)
    }

    pub fn claims(&self) -> InviteClaims {
        InviteClaims {
            email: self.email.clone(),
            expires_at: self.expires_at,
        }
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_code(&self.payload(), &self.signature))
    }
}
