//! Error types for PASU invite codes.

use thiserror::Error;

/// Reasons a presented invite code is rejected.
///
/// Each variant maps to a different message in the signup flow, so callers
/// are expected to match on it rather than on the display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InviteError {
    /// Wrong part count, bad base64, or unparseable payload fields.
    #[error("malformed invite code")]
    MalformedCode,

    /// Structurally valid, but the MAC does not match the payload.
    #[error("invalid invite code signature")]
    InvalidSignature,

    /// Valid signature, bound to a different email.
    #[error("invite code was issued for a different email")]
    EmailMismatch,

    /// Valid signature and email, past expiry.
    #[error("invite code has expired")]
    Expired,
}

impl InviteError {
    /// The message shown to the person trying to sign up.
    pub fn user_message(&self) -> &'static str {
        match self {
            InviteError::MalformedCode | InviteError::InvalidSignature => {
                "This invite code is invalid. Check that it was copied exactly."
            }
            InviteError::EmailMismatch => {
                "This invite code was issued for a different email address."
            }
            InviteError::Expired => "This invite code has expired. Please request a new one.",
        }
    }

    /// Stable short name, suitable for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            InviteError::MalformedCode => "malformed_code",
            InviteError::InvalidSignature => "invalid_signature",
            InviteError::EmailMismatch => "email_mismatch",
            InviteError::Expired => "expired",
        }
    }
}

/// Errors constructing the signing key. Raised once, at startup.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The environment variable holding the secret is not set.
    #[error("invite secret is not configured: ${var} is unset")]
    MissingSecret { var: String },

    /// The secret is present but empty.
    #[error("invite secret is empty")]
    EmptySecret,

    /// The MAC rejected the key length.
    #[error("invite secret has an unusable length: {0}")]
    InvalidLength(usize),
}
