//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pasu_invite::{
    InviteNotice, InvitePortal, IssuedInvite, Notifier, NotifyError, PortalConfig,
    ValidityPolicy,
};
use pasu_invite_core::{Clock, InviteCodeService, SecretKey, DAY_MILLIS};
use pasu_invite_store::{ApplicationId, MemoryStore, NewApplication};

/// Secret used by [`TestFixture::new`].
pub const FIXTURE_SECRET: &[u8] = b"pasu-testkit-fixture-secret";

/// Start time of every fixture clock: 2026-01-01T00:00:00Z.
pub const FIXTURE_EPOCH: i64 = 1_767_225_600_000;

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self(AtomicI64::new(start))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance_millis(days * DAY_MILLIS);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Records every notice. Can be switched to fail delivery.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<InviteNotice>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent deliveries fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All notices accepted so far.
    pub fn sent(&self) -> Vec<InviteNotice> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }

    pub fn last(&self) -> Option<InviteNotice> {
        self.sent().pop()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_invite(&self, notice: &InviteNotice) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery("recording notifier set to fail".to_string()));
        }
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(notice.clone());
        Ok(())
    }
}

/// The portal type every fixture builds.
pub type FixturePortal = InvitePortal<MemoryStore, Arc<RecordingNotifier>, Arc<ManualClock>>;

/// A portal on a memory store, a manual clock and a recording notifier.
pub struct TestFixture {
    pub secret: SecretKey,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub portal: FixturePortal,
}

impl TestFixture {
    /// Create a fixture with the fixed secret and the standard policy.
    pub fn new() -> Self {
        Self::with_policy(ValidityPolicy::default())
    }

    /// Create a fixture with a custom validity policy.
    pub fn with_policy(policy: ValidityPolicy) -> Self {
        let secret = SecretKey::new(FIXTURE_SECRET.to_vec()).expect("fixture secret is non-empty");
        Self::build(secret, policy)
    }

    /// Create a fixture with a random secret.
    pub fn random() -> Self {
        Self::build(SecretKey::generate(), ValidityPolicy::default())
    }

    fn build(secret: SecretKey, policy: ValidityPolicy) -> Self {
        let clock = Arc::new(ManualClock::new(FIXTURE_EPOCH));
        let notifier = Arc::new(RecordingNotifier::new());
        let config = PortalConfig {
            secret: secret.clone(),
            validity: policy,
        };
        let portal = InvitePortal::with_clock(
            &config,
            MemoryStore::new(),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        )
        .expect("fixture portal");
        Self {
            secret,
            clock,
            notifier,
            portal,
        }
    }

    /// A code service sharing this fixture's secret and clock.
    pub fn service(&self) -> InviteCodeService<Arc<ManualClock>> {
        InviteCodeService::with_clock(&self.secret, Arc::clone(&self.clock))
            .expect("fixture service")
    }

    /// Current fixture time.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Submit a pending application for `email`.
    pub async fn pending_application(&self, email: &str) -> ApplicationId {
        self.portal
            .submit(NewApplication::new(email, "Acme Wellness", "Dana Reyes"))
            .await
            .expect("submit application")
    }

    /// Submit and approve an application, returning the issued invite.
    pub async fn approved_application(&self, email: &str, validity_days: u32) -> IssuedInvite {
        let id = self.pending_application(email).await;
        self.portal
            .approve(id, Some(validity_days))
            .await
            .expect("approve application")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
