//! Notifier: delivery of issued invites to partners.
//!
//! Email delivery is owned by a transactional-email provider. The portal
//! only hands it an [`InviteNotice`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use pasu_invite_store::ApplicationId;
use thiserror::Error;

/// Everything the delivery side needs to tell a partner about their invite.
#[derive(Clone, PartialEq, Eq)]
pub struct InviteNotice {
    pub application_id: ApplicationId,
    pub email: String,
    pub company: String,
    pub contact_name: String,
    /// Wire form of the code.
    pub code: String,
    pub expires_at: i64,
    /// True when this replaces an earlier code.
    pub regenerated: bool,
}

impl fmt::Debug for InviteNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InviteNotice")
            .field("application_id", &self.application_id)
            .field("email", &self.email)
            .field("company", &self.company)
            .field("contact_name", &self.contact_name)
            .field("code", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("regenerated", &self.regenerated)
            .finish()
    }
}

/// Errors reported by a notifier.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The provider could not be reached or returned a failure.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Delivers invite notices.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_invite(&self, notice: &InviteNotice) -> Result<(), NotifyError>;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    async fn send_invite(&self, notice: &InviteNotice) -> Result<(), NotifyError> {
        (**self).send_invite(notice).await
    }
}

/// Logs each notice instead of delivering it. Never logs the code.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send_invite(&self, notice: &InviteNotice) -> Result<(), NotifyError> {
        tracing::info!(
            application = %notice.application_id,
            expires_at = notice.expires_at,
            regenerated = notice.regenerated,
            "invite ready for delivery"
        );
        Ok(())
    }
}
