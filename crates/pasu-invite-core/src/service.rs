//! Issuing and verifying invite codes.

use crate::canonical::{
    canonical_email, decode_segment, parse_expiry, payload_bytes, split_code, split_payload,
    strip_prefix, DAY_MILLIS,
};
use crate::clock::{Clock, SystemClock};
use crate::crypto::{InviteSigner, SecretKey, DEFAULT_SECRET_VAR};
use crate::error::{InviteError, KeyError};
use crate::types::{InviteClaims, InviteCode};

/// Issues and verifies signed, email-bound invite codes.
///
/// Stateless apart from the keyed signer; safe to share across threads.
/// Consumption is not tracked here: a valid code verifies every time it
/// is presented, and single use is enforced by the caller's store.
#[derive(Debug, Clone)]
pub struct InviteCodeService<C: Clock = SystemClock> {
    signer: InviteSigner,
    clock: C,
}

impl InviteCodeService<SystemClock> {
    /// Create a service on the wall clock.
    pub fn new(secret: &SecretKey) -> Result<Self, KeyError> {
        Self::with_clock(secret, SystemClock)
    }

    /// Create a service from `$INVITE_CODE_SECRET`. Call once at startup.
    pub fn from_env() -> Result<Self, KeyError> {
        Self::new(&SecretKey::from_env(DEFAULT_SECRET_VAR)?)
    }
}

impl<C: Clock> InviteCodeService<C> {
    /// Create a service on a custom clock.
    pub fn with_clock(secret: &SecretKey, clock: C) -> Result<Self, KeyError> {
        Ok(Self {
            signer: InviteSigner::new(secret)?,
            clock,
        })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Issue a code for `email`, valid for `validity_days` from now.
    ///
    /// The day count is not range-checked here; policy belongs to the caller.
    /// Every call produces a new code because the expiry moves with the clock.
    pub fn issue(&self, email: &str, validity_days: u32) -> String {
        self.issue_at(email, validity_days, self.clock.now_millis())
            .to_string()
    }

    /// Issue a code as of `now` (Unix ms).
    pub fn issue_at(&self, email: &str, validity_days: u32, now: i64) -> InviteCode {
        let email = canonical_email(email);
        let expires_at = now.saturating_add(i64::from(validity_days).saturating_mul(DAY_MILLIS));
        let signature = self.signer.sign(&payload_bytes(&email, expires_at));
        InviteCode {
            email,
            expires_at,
            signature,
        }
    }

    /// Verify an untrusted code presented together with `claimed_email`.
    pub fn verify(&self, code: &str, claimed_email: &str) -> Result<InviteClaims, InviteError> {
        self.verify_at(code, claimed_email, self.clock.now_millis())
    }

    /// Verify as of `now` (Unix ms).
    ///
    /// Checks run in a fixed order: structure, signature, email, expiry.
    /// The signature is always checked before any claim in the payload is
    /// trusted, and the tag comparison is constant-time.
    pub fn verify_at(
        &self,
        code: &str,
        claimed_email: &str,
        now: i64,
    ) -> Result<InviteClaims, InviteError> {
        let (encoded_payload, encoded_signature) = split_code(strip_prefix(code))?;
        let payload = decode_segment(encoded_payload).ok_or(InviteError::MalformedCode)?;
        let (embedded_email, expiry) = split_payload(&payload)?;

        let expected = self.signer.sign(&payload);
        let provided = decode_segment(encoded_signature).ok_or(InviteError::InvalidSignature)?;
        if !expected.matches(&provided) {
            return Err(InviteError::InvalidSignature);
        }

        if embedded_email.to_lowercase() != canonical_email(claimed_email) {
            return Err(InviteError::EmailMismatch);
        }

        let claims = InviteClaims {
            email: embedded_email.to_string(),
            expires_at: parse_expiry(expiry)?,
        };
        if claims.is_expired_at(now) {
            return Err(InviteError::Expired);
        }
        Ok(claims)
    }

    /// Decode a code's claims without checking its signature.
    ///
    /// For trusted admin display only. Never use the result to authorize.
    pub fn inspect(&self, code: &str) -> Option<InviteClaims> {
        inspect(code)
    }
}

/// Decode a code's claims without checking its signature.
///
/// Returns `None` on any parse failure. Uses no secret.
pub fn inspect(code: &str) -> Option<InviteClaims> {
    let (encoded_payload, _) = split_code(strip_prefix(code)).ok()?;
    let payload = decode_segment(encoded_payload)?;
    let (email, expiry) = split_payload(&payload).ok()?;
    Some(InviteClaims {
        email: email.to_string(),
        expires_at: parse_expiry(expiry).ok()?,
    })
}
