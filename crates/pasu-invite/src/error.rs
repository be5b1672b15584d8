//! Error types for the invite portal.

use pasu_invite_core::{InviteError, KeyError};
use pasu_invite_store::{ApplicationId, ApplicationStatus, StoreError};
use thiserror::Error;

/// Errors loading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Secret missing or unusable.
    #[error("secret: {0}")]
    Secret(#[from] KeyError),

    /// Validity override is not a number within policy.
    #[error("invalid ${var}={value}: expected a day count between {min} and {max}")]
    InvalidValidityDays {
        var: &'static str,
        value: String,
        min: u32,
        max: u32,
    },
}

/// Errors from the admin-side review operations.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Signing key error.
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Application not found.
    #[error("application not found: {0}")]
    ApplicationNotFound(ApplicationId),

    /// The application is not in a status that allows the operation.
    #[error("application {id} is {status}, expected {expected}")]
    InvalidStatus {
        id: ApplicationId,
        status: ApplicationStatus,
        expected: ApplicationStatus,
    },

    /// The application's invite has already been redeemed.
    #[error("application {0} has already been used")]
    AlreadyUsed(ApplicationId),

    /// Validity window outside policy.
    #[error("validity of {days} days is outside {min}..={max}")]
    InvalidValidity { days: u32, min: u32, max: u32 },

    /// Email cannot be bound into an invite code.
    #[error("invalid email: {0}")]
    InvalidEmail(String),
}

/// Reasons a signup attempt is refused.
///
/// `Invite` carries the code-level rejection; the other variants are the
/// store-side checks that run after the code verifies.
#[derive(Debug, Error)]
pub enum SignupError {
    /// The code itself was rejected.
    #[error("invite rejected: {0}")]
    Invite(#[from] InviteError),

    /// No application is bound to the verified email.
    #[error("no application for this email")]
    ApplicationNotFound,

    /// The application has not been approved, or was revoked.
    #[error("application is {0}")]
    NotApproved(ApplicationStatus),

    /// The application's invite has already been redeemed.
    #[error("invite has already been used")]
    AlreadyUsed,

    /// The stored invite expiry has passed.
    #[error("application invite has expired")]
    ApplicationExpired,

    /// A newer code has been issued for this application.
    #[error("invite code has been superseded")]
    CodeSuperseded,

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl SignupError {
    /// The message shown to the person trying to sign up.
    pub fn user_message(&self) -> &'static str {
        match self {
            SignupError::Invite(e) => e.user_message(),
            SignupError::ApplicationNotFound | SignupError::CodeSuperseded => {
                "This invite code is invalid. Check that it was copied exactly."
            }
            SignupError::NotApproved(_) => "This partner application is not approved.",
            SignupError::AlreadyUsed => "This invite code has already been used. Please sign in.",
            SignupError::ApplicationExpired => InviteError::Expired.user_message(),
            SignupError::Store(_) => "Something went wrong. Please try again shortly.",
        }
    }
}

/// Result type for portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;
