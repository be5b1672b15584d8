//! ApplicationStore trait: the abstract interface for application persistence.
//!
//! The production backend is a hosted relational database owned by the web
//! application. The workflows only see this trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Application, ApplicationId, ApplicationStatus, NewApplication};

/// Result of the conditional redemption update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkUsedResult {
    /// This call flipped the application to used.
    Marked,
    /// The application was already used; nothing changed.
    AlreadyUsed {
        /// When the earlier redemption happened (Unix ms).
        used_at: Option<i64>,
    },
    /// The application is no longer approved; nothing changed.
    NotApproved { status: ApplicationStatus },
    /// The stored code is not the presented one; nothing changed.
    Superseded,
}

/// Async interface for partner application persistence.
///
/// # Design Notes
///
/// - **Canonical emails**: implementations store and look up emails in
///   lowercased, trimmed form, so `find_by_email` is case-insensitive.
/// - **Unique emails**: inserting a second application for the same email
///   returns `DuplicateEmail`.
/// - **Conditional writes**: `approve_with_invite`, `record_invite` and
///   `mark_used` check their preconditions and write in one atomic step
///   (e.g. `UPDATE ... WHERE status = 'approved' AND used = false`).
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Insert a new pending application.
    async fn insert_application(
        &self,
        application: NewApplication,
        created_at: i64,
    ) -> Result<ApplicationId>;

    /// Get an application by ID.
    async fn get_application(&self, id: ApplicationId) -> Result<Option<Application>>;

    /// Find the application bound to an email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Application>>;

    /// List applications, optionally filtered by status, ordered by ID.
    async fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>>;

    /// Move an application to a new review status.
    ///
    /// Fails with `InvalidTransition` for transitions the status does not
    /// allow, and with `AlreadyUsed` once the application is redeemed.
    async fn set_status(&self, id: ApplicationId, status: ApplicationStatus, at: i64)
        -> Result<()>;

    /// Attach the first invite and move a pending application to approved.
    ///
    /// Fails with `StatusMismatch` unless the application is pending.
    async fn approve_with_invite(
        &self,
        id: ApplicationId,
        code: &str,
        expires_at: i64,
        at: i64,
    ) -> Result<()>;

    /// Replace the invite code and expiry of an approved, unused application.
    ///
    /// Fails with `StatusMismatch` unless approved, `AlreadyUsed` once redeemed.
    async fn record_invite(&self, id: ApplicationId, code: &str, expires_at: i64) -> Result<()>;

    /// Mark the application as used if it is approved, unused, and still
    /// holds `code`.
    async fn mark_used(&self, id: ApplicationId, code: &str, at: i64) -> Result<MarkUsedResult>;
}
