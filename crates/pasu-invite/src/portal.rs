//! The InvitePortal: review and signup workflows over invite codes.
//!
//! The portal ties the code service to the application store and the
//! notifier. Code-level checks (signature, email binding, expiry) come from
//! the core; store-level checks (status, single use, current code) are
//! layered on top here.

use std::fmt;
use std::sync::Arc;

use pasu_invite_core::{
    canonical_email, constant_time_eq, normalize_code, Clock, InviteClaims, InviteCodeService,
    SystemClock, PAYLOAD_DELIMITER,
};
use pasu_invite_store::{
    Application, ApplicationId, ApplicationStatus, ApplicationStore, MarkUsedResult,
    NewApplication, StoreError,
};

use crate::config::PortalConfig;
use crate::error::{PortalError, Result, SignupError};
use crate::notify::{InviteNotice, Notifier};
use crate::policy::ValidityPolicy;

/// An invite issued by `approve` or `regenerate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedInvite {
    pub application_id: ApplicationId,
    /// Wire form of the code, as stored.
    pub code: String,
    pub expires_at: i64,
    /// Whether the notifier accepted the notice.
    pub delivered: bool,
}

/// A signup that passed every check and may now create its account.
#[derive(Clone, PartialEq, Eq)]
pub struct ApprovedSignup {
    pub application_id: ApplicationId,
    pub email: String,
    pub company: String,
    pub expires_at: i64,
    /// The presented code, re-checked against the store on completion.
    code: String,
}

impl fmt::Debug for ApprovedSignup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApprovedSignup")
            .field("application_id", &self.application_id)
            .field("email", &self.email)
            .field("company", &self.company)
            .field("expires_at", &self.expires_at)
            .field("code", &"<redacted>")
            .finish()
    }
}

/// The invite portal.
///
/// Provides:
/// - Submitting partner applications
/// - Approving, regenerating, and rejecting them (admin review)
/// - Checking and completing partner signups
pub struct InvitePortal<S: ApplicationStore, N: Notifier, C: Clock = SystemClock> {
    /// Code issuance and verification.
    invites: InviteCodeService<C>,
    /// The application store.
    store: Arc<S>,
    /// Invite delivery.
    notifier: N,
    /// Validity window.
    policy: ValidityPolicy,
}

impl<S: ApplicationStore, N: Notifier> InvitePortal<S, N, SystemClock> {
    /// Create a portal on the wall clock.
    pub fn new(config: &PortalConfig, store: S, notifier: N) -> Result<Self> {
        Self::with_clock(config, store, notifier, SystemClock)
    }
}

impl<S: ApplicationStore, N: Notifier, C: Clock> InvitePortal<S, N, C> {
    /// Create a portal on a custom clock.
    pub fn with_clock(config: &PortalConfig, store: S, notifier: N, clock: C) -> Result<Self> {
        Ok(Self {
            invites: InviteCodeService::with_clock(&config.secret, clock)?,
            store: Arc::new(store),
            notifier,
            policy: config.validity,
        })
    }

    /// The underlying code service.
    pub fn invites(&self) -> &InviteCodeService<C> {
        &self.invites
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &ValidityPolicy {
        &self.policy
    }

    fn now(&self) -> i64 {
        self.invites.clock().now_millis()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Review Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record a new pending application.
    pub async fn submit(&self, application: NewApplication) -> Result<ApplicationId> {
        validate_email(&application.email)?;
        let id = self.store.insert_application(application, self.now()).await?;
        tracing::info!(application = %id, "application submitted");
        Ok(id)
    }

    /// Approve a pending application and issue its invite.
    ///
    /// `validity_days` defaults to the policy default. The invite is stored
    /// before delivery is attempted, so a notifier failure leaves a valid,
    /// re-sendable invite behind (reported as `delivered: false`).
    pub async fn approve(
        &self,
        id: ApplicationId,
        validity_days: Option<u32>,
    ) -> Result<IssuedInvite> {
        let days = self.policy.resolve(validity_days)?;
        let app = self.load(id).await?;
        expect_status(&app, ApplicationStatus::Pending)?;
        validate_email(&app.email)?;

        let now = self.now();
        let code = self.invites.issue_at(&app.email, days, now);
        let wire = code.to_string();

        self.store
            .approve_with_invite(id, &wire, code.expires_at(), now)
            .await
            .map_err(review_error)?;
        tracing::info!(
            application = %id,
            days,
            expires_at = code.expires_at(),
            "application approved"
        );

        let delivered = self.deliver(&app, &wire, code.expires_at(), false).await;
        Ok(IssuedInvite {
            application_id: id,
            code: wire,
            expires_at: code.expires_at(),
            delivered,
        })
    }

    /// Issue a replacement invite for an approved, unused application.
    ///
    /// Always a brand-new code with a fresh expiry; the previous code is
    /// superseded in the store and will be refused at signup.
    pub async fn regenerate(
        &self,
        id: ApplicationId,
        validity_days: Option<u32>,
    ) -> Result<IssuedInvite> {
        let days = self.policy.resolve(validity_days)?;
        let app = self.load(id).await?;
        expect_status(&app, ApplicationStatus::Approved)?;
        if app.used {
            return Err(PortalError::AlreadyUsed(id));
        }

        let code = self.invites.issue_at(&app.email, days, self.now());
        let wire = code.to_string();

        self.store
            .record_invite(id, &wire, code.expires_at())
            .await
            .map_err(review_error)?;
        tracing::info!(
            application = %id,
            days,
            expires_at = code.expires_at(),
            "invite regenerated"
        );

        let delivered = self.deliver(&app, &wire, code.expires_at(), true).await;
        Ok(IssuedInvite {
            application_id: id,
            code: wire,
            expires_at: code.expires_at(),
            delivered,
        })
    }

    /// Reject a pending application, or revoke an approved unused one.
    pub async fn reject(&self, id: ApplicationId) -> Result<()> {
        let app = self.load(id).await?;
        if app.used {
            return Err(PortalError::AlreadyUsed(id));
        }
        if !app.status.can_transition_to(ApplicationStatus::Rejected) {
            return Err(PortalError::InvalidStatus {
                id,
                status: app.status,
                expected: ApplicationStatus::Pending,
            });
        }

        self.store
            .set_status(id, ApplicationStatus::Rejected, self.now())
            .await
            .map_err(review_error)?;
        tracing::info!(application = %id, previous = %app.status, "application rejected");
        Ok(())
    }

    /// Applications for the review queue, optionally filtered by status.
    pub async fn applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>> {
        Ok(self.store.list_applications(status).await?)
    }

    /// Decode the stored invite for admin display.
    ///
    /// Uses `inspect`, so nothing about the result is verified. Display only.
    pub async fn stored_invite(&self, id: ApplicationId) -> Result<Option<InviteClaims>> {
        let app = self.load(id).await?;
        Ok(app
            .invite_code
            .as_deref()
            .and_then(|code| self.invites.inspect(code)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Signup Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Check an email + code pair presented at signup.
    ///
    /// Verifies the code, then confirms the bound application is approved,
    /// unused, unexpired, and still holds this exact code. Nothing is
    /// written; call [`complete_signup`](Self::complete_signup) once the
    /// account exists.
    pub async fn check_signup(
        &self,
        email: &str,
        code: &str,
    ) -> std::result::Result<ApprovedSignup, SignupError> {
        let now = self.now();

        let claims = self.invites.verify_at(code, email, now).map_err(|e| {
            tracing::warn!(reason = e.kind(), "signup code rejected");
            SignupError::Invite(e)
        })?;

        let app = self
            .store
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!(reason = "no_application", "signup refused");
                SignupError::ApplicationNotFound
            })?;

        let refused = if app.status != ApplicationStatus::Approved {
            Some(SignupError::NotApproved(app.status))
        } else if app.used {
            Some(SignupError::AlreadyUsed)
        } else if app.invite_expired_at(now) {
            Some(SignupError::ApplicationExpired)
        } else if !holds_code(&app, code) {
            Some(SignupError::CodeSuperseded)
        } else {
            None
        };
        if let Some(err) = refused {
            tracing::warn!(application = %app.id, reason = %err, "signup refused");
            return Err(err);
        }

        Ok(ApprovedSignup {
            application_id: app.id,
            email: app.email,
            company: app.company,
            expires_at: claims.expires_at,
            code: normalize_code(code),
        })
    }

    /// Mark the application as used after the account has been created.
    ///
    /// Exactly one completion per application succeeds; later ones get
    /// `AlreadyUsed`. A revocation or regeneration since `check_signup`
    /// refuses the completion.
    pub async fn complete_signup(
        &self,
        signup: &ApprovedSignup,
    ) -> std::result::Result<(), SignupError> {
        let id = signup.application_id;
        let refused = match self.store.mark_used(id, &signup.code, self.now()).await? {
            MarkUsedResult::Marked => {
                tracing::info!(application = %id, "invite redeemed");
                return Ok(());
            }
            MarkUsedResult::AlreadyUsed { .. } => SignupError::AlreadyUsed,
            MarkUsedResult::NotApproved { status } => SignupError::NotApproved(status),
            MarkUsedResult::Superseded => SignupError::CodeSuperseded,
        };
        tracing::warn!(application = %id, reason = %refused, "signup completion refused");
        Err(refused)
    }

    /// `check_signup` followed by `complete_signup`, for callers with no
    /// account step in between.
    pub async fn redeem(
        &self,
        email: &str,
        code: &str,
    ) -> std::result::Result<ApprovedSignup, SignupError> {
        let signup = self.check_signup(email, code).await?;
        self.complete_signup(&signup).await?;
        Ok(signup)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal Methods
    // ─────────────────────────────────────────────────────────────────────────

    async fn load(&self, id: ApplicationId) -> Result<Application> {
        self.store
            .get_application(id)
            .await?
            .ok_or(PortalError::ApplicationNotFound(id))
    }

    async fn deliver(
        &self,
        app: &Application,
        code: &str,
        expires_at: i64,
        regenerated: bool,
    ) -> bool {
        let notice = InviteNotice {
            application_id: app.id,
            email: app.email.clone(),
            company: app.company.clone(),
            contact_name: app.contact_name.clone(),
            code: code.to_string(),
            expires_at,
            regenerated,
        };
        match self.notifier.send_invite(&notice).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(application = %app.id, error = %e, "invite delivery failed");
                false
            }
        }
    }
}

fn expect_status(app: &Application, expected: ApplicationStatus) -> Result<()> {
    if app.status == expected {
        Ok(())
    } else {
        Err(PortalError::InvalidStatus {
            id: app.id,
            status: app.status,
            expected,
        })
    }
}

/// Map a refused conditional write to the review error it stands for.
fn review_error(err: StoreError) -> PortalError {
    match err {
        StoreError::StatusMismatch {
            id,
            status,
            expected,
        } => PortalError::InvalidStatus {
            id,
            status,
            expected,
        },
        StoreError::InvalidTransition { id, from, .. } => PortalError::InvalidStatus {
            id,
            status: from,
            expected: ApplicationStatus::Pending,
        },
        StoreError::AlreadyUsed(id) => PortalError::AlreadyUsed(id),
        other => PortalError::Store(other),
    }
}

/// Reject emails that cannot round-trip through the payload encoding.
fn validate_email(email: &str) -> Result<()> {
    let email = canonical_email(email);
    if email.is_empty() {
        return Err(PortalError::InvalidEmail("email is empty".to_string()));
    }
    if email.as_bytes().contains(&PAYLOAD_DELIMITER) {
        return Err(PortalError::InvalidEmail(format!(
            "{email} contains '{}'",
            PAYLOAD_DELIMITER as char
        )));
    }
    if !email.contains('@') {
        return Err(PortalError::InvalidEmail(format!("{email} has no '@'")));
    }
    Ok(())
}

/// Whether the presented code is the application's current one.
fn holds_code(app: &Application, presented: &str) -> bool {
    match app.invite_code.as_deref() {
        Some(stored) => constant_time_eq(
            normalize_code(stored).as_bytes(),
            normalize_code(presented).as_bytes(),
        ),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyError;
    use async_trait::async_trait;
    use pasu_invite_core::{FixedClock, SecretKey, DAY_MILLIS};
    use pasu_invite_store::MemoryStore;
    use std::sync::atomic::{AtomicBool, Ordering};

    const T0: i64 = 1_767_225_600_000;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send_invite(&self, _: &InviteNotice) -> std::result::Result<(), NotifyError> {
            Err(NotifyError::Delivery("provider unavailable".to_string()))
        }
    }

    /// Delegates to a `MemoryStore`, yielding after every read so
    /// concurrent workflows interleave between load and write. When armed,
    /// the next `get_application` also revokes the row after reading it.
    #[derive(Default)]
    struct YieldingStore(MemoryStore, AtomicBool);

    #[async_trait]
    impl ApplicationStore for YieldingStore {
        async fn insert_application(
            &self,
            application: NewApplication,
            created_at: i64,
        ) -> pasu_invite_store::Result<ApplicationId> {
            self.0.insert_application(application, created_at).await
        }

        async fn get_application(
            &self,
            id: ApplicationId,
        ) -> pasu_invite_store::Result<Option<Application>> {
            let app = self.0.get_application(id).await;
            if self.1.swap(false, Ordering::SeqCst) {
                self.0.set_status(id, ApplicationStatus::Rejected, T0).await?;
            }
            tokio::task::yield_now().await;
            app
        }

        async fn find_by_email(
            &self,
            email: &str,
        ) -> pasu_invite_store::Result<Option<Application>> {
            let app = self.0.find_by_email(email).await;
            tokio::task::yield_now().await;
            app
        }

        async fn list_applications(
            &self,
            status: Option<ApplicationStatus>,
        ) -> pasu_invite_store::Result<Vec<Application>> {
            self.0.list_applications(status).await
        }

        async fn set_status(
            &self,
            id: ApplicationId,
            status: ApplicationStatus,
            at: i64,
        ) -> pasu_invite_store::Result<()> {
            self.0.set_status(id, status, at).await
        }

        async fn approve_with_invite(
            &self,
            id: ApplicationId,
            code: &str,
            expires_at: i64,
            at: i64,
        ) -> pasu_invite_store::Result<()> {
            self.0.approve_with_invite(id, code, expires_at, at).await
        }

        async fn record_invite(
            &self,
            id: ApplicationId,
            code: &str,
            expires_at: i64,
        ) -> pasu_invite_store::Result<()> {
            self.0.record_invite(id, code, expires_at).await
        }

        async fn mark_used(
            &self,
            id: ApplicationId,
            code: &str,
            at: i64,
        ) -> pasu_invite_store::Result<MarkUsedResult> {
            self.0.mark_used(id, code, at).await
        }
    }

    fn config() -> PortalConfig {
        PortalConfig::new(SecretKey::new(b"portal-unit-test".to_vec()).unwrap())
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("hr@acme.example").is_ok());
        assert!(matches!(validate_email("  "), Err(PortalError::InvalidEmail(_))));
        assert!(matches!(validate_email("a|b@x.com"), Err(PortalError::InvalidEmail(_))));
        assert!(matches!(validate_email("no-at-sign"), Err(PortalError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_invite() {
        let portal =
            InvitePortal::with_clock(&config(), MemoryStore::new(), FailingNotifier, FixedClock(T0))
                .unwrap();
        let id = portal
            .submit(NewApplication::new("hr@acme.example", "Acme", "Dana"))
            .await
            .unwrap();

        let issued = portal.approve(id, Some(7)).await.unwrap();
        assert!(!issued.delivered);
        assert_eq!(issued.expires_at, T0 + 7 * DAY_MILLIS);

        let app = portal.store().get_application(id).await.unwrap().unwrap();
        assert_eq!(app.status, ApplicationStatus::Approved);
        assert_eq!(app.invite_code.as_deref(), Some(issued.code.as_str()));
    }

    #[tokio::test]
    async fn test_holds_code_tolerates_formatting() {
        let portal =
            InvitePortal::with_clock(&config(), MemoryStore::new(), FailingNotifier, FixedClock(T0))
                .unwrap();
        let id = portal
            .submit(NewApplication::new("hr@acme.example", "Acme", "Dana"))
            .await
            .unwrap();
        let issued = portal.approve(id, None).await.unwrap();
        let app = portal.store().get_application(id).await.unwrap().unwrap();

        let lower_prefix = format!("  pasu-{}\n", &issued.code[5..]);
        assert!(holds_code(&app, &issued.code));
        assert!(holds_code(&app, &lower_prefix));
        assert!(!holds_code(&app, "PASU-other::code"));
    }

    #[tokio::test]
    async fn test_concurrent_approvals_store_the_delivered_code() {
        let portal = InvitePortal::with_clock(
            &config(),
            YieldingStore::default(),
            FailingNotifier,
            FixedClock(T0),
        )
        .unwrap();
        let id = portal
            .submit(NewApplication::new("hr@acme.example", "Acme", "Dana"))
            .await
            .unwrap();

        // Both approvals load the pending row before either writes.
        let (first, second) = tokio::join!(
            portal.approve(id, Some(7)),
            portal.approve(id, Some(30))
        );
        let (winner, loser) = match (first, second) {
            (Ok(issued), Err(err)) | (Err(err), Ok(issued)) => (issued, err),
            (first, second) => panic!("expected one winner, got {first:?} and {second:?}"),
        };
        assert!(matches!(
            loser,
            PortalError::InvalidStatus {
                status: ApplicationStatus::Approved,
                expected: ApplicationStatus::Pending,
                ..
            }
        ));

        let app = portal.store().get_application(id).await.unwrap().unwrap();
        assert_eq!(app.invite_code.as_deref(), Some(winner.code.as_str()));
        assert_eq!(app.invite_expires_at, Some(winner.expires_at));
        portal.redeem("hr@acme.example", &winner.code).await.unwrap();
    }

    #[tokio::test]
    async fn test_regenerate_after_revocation_refused() {
        let portal = InvitePortal::with_clock(
            &config(),
            YieldingStore::default(),
            FailingNotifier,
            FixedClock(T0),
        )
        .unwrap();
        let id = portal
            .submit(NewApplication::new("hr@acme.example", "Acme", "Dana"))
            .await
            .unwrap();
        let issued = portal.approve(id, None).await.unwrap();

        // The revocation lands between regenerate's load and its write.
        portal.store().1.store(true, Ordering::SeqCst);
        let regenerated = portal.regenerate(id, None).await;
        assert!(matches!(
            regenerated,
            Err(PortalError::InvalidStatus {
                status: ApplicationStatus::Rejected,
                ..
            })
        ));

        let app = portal.store().get_application(id).await.unwrap().unwrap();
        assert_eq!(app.status, ApplicationStatus::Rejected);
        assert_eq!(app.invite_code.as_deref(), Some(issued.code.as_str()));
    }

    #[test]
    fn test_approved_signup_debug_redacts_code() {
        let signup = ApprovedSignup {
            application_id: ApplicationId(1),
            email: "hr@acme.example".to_string(),
            company: "Acme".to_string(),
            expires_at: T0,
            code: "PASU-secretpayload::secretsig".to_string(),
        };
        assert!(!format!("{signup:?}").contains("secretpayload"));
    }
}
