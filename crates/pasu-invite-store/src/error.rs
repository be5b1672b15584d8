//! Error types for the store module.

use thiserror::Error;

use crate::types::{ApplicationId, ApplicationStatus};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Application not found.
    #[error("application not found: {0}")]
    NotFound(ApplicationId),

    /// Another application already uses this email.
    #[error("an application already exists for {email}")]
    DuplicateEmail { email: String },

    /// The application's state does not allow the update.
    #[error("application {id} cannot change from {from} to {to}")]
    InvalidTransition {
        id: ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    /// A conditional update found the application in another status.
    #[error("application {id} is {status}, expected {expected}")]
    StatusMismatch {
        id: ApplicationId,
        status: ApplicationStatus,
        expected: ApplicationStatus,
    },

    /// The application has already been redeemed and is read-only.
    #[error("application {0} has already been used")]
    AlreadyUsed(ApplicationId),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
