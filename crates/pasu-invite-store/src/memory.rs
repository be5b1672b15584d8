//! In-memory implementation of the ApplicationStore trait.
//!
//! Same semantics as the hosted database, with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use pasu_invite_core::{canonical_email, constant_time_eq, normalize_code};

use crate::error::{Result, StoreError};
use crate::traits::{ApplicationStore, MarkUsedResult};
use crate::types::{Application, ApplicationId, ApplicationStatus, NewApplication};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Applications indexed by ID.
    applications: BTreeMap<ApplicationId, Application>,

    /// Email index: canonical email -> application ID.
    by_email: HashMap<String, ApplicationId>,

    /// Last assigned ID.
    last_id: u64,
}

impl MemoryStoreInner {
    fn get_mut(&mut self, id: ApplicationId) -> Result<&mut Application> {
        self.applications
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))
    }

    /// The application, if it is unused and in `expected` status.
    fn get_unused_in(
        &mut self,
        id: ApplicationId,
        expected: ApplicationStatus,
    ) -> Result<&mut Application> {
        let app = self.get_mut(id)?;
        if app.used {
            return Err(StoreError::AlreadyUsed(id));
        }
        if app.status != expected {
            return Err(StoreError::StatusMismatch {
                id,
                status: app.status,
                expected,
            });
        }
        Ok(app)
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    /// Number of stored applications.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.applications.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_application(
        &self,
        application: NewApplication,
        created_at: i64,
    ) -> Result<ApplicationId> {
        let mut inner = self.write()?;

        let email = canonical_email(&application.email);
        if inner.by_email.contains_key(&email) {
            return Err(StoreError::DuplicateEmail { email });
        }

        inner.last_id += 1;
        let id = ApplicationId(inner.last_id);
        inner.by_email.insert(email.clone(), id);
        inner.applications.insert(
            id,
            Application {
                id,
                email,
                company: application.company,
                contact_name: application.contact_name,
                status: ApplicationStatus::Pending,
                invite_code: None,
                invite_expires_at: None,
                used: false,
                used_at: None,
                created_at,
                reviewed_at: None,
            },
        );

        tracing::debug!(%id, "inserted application");
        Ok(id)
    }

    async fn get_application(&self, id: ApplicationId) -> Result<Option<Application>> {
        let inner = self.read()?;
        Ok(inner.applications.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Application>> {
        let inner = self.read()?;
        Ok(inner
            .by_email
            .get(&canonical_email(email))
            .and_then(|id| inner.applications.get(id))
            .cloned())
    }

    async fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>> {
        let inner = self.read()?;
        Ok(inner
            .applications
            .values()
            .filter(|app| status.map_or(true, |s| app.status == s))
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        at: i64,
    ) -> Result<()> {
        let mut inner = self.write()?;
        let app = inner.get_mut(id)?;

        if app.used {
            return Err(StoreError::AlreadyUsed(id));
        }
        if !app.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                id,
                from: app.status,
                to: status,
            });
        }

        app.status = status;
        app.reviewed_at = Some(at);
        tracing::debug!(%id, %status, "updated application status");
        Ok(())
    }

    async fn approve_with_invite(
        &self,
        id: ApplicationId,
        code: &str,
        expires_at: i64,
        at: i64,
    ) -> Result<()> {
        let mut inner = self.write()?;
        let app = inner.get_unused_in(id, ApplicationStatus::Pending)?;

        app.invite_code = Some(code.to_string());
        app.invite_expires_at = Some(expires_at);
        app.status = ApplicationStatus::Approved;
        app.reviewed_at = Some(at);
        tracing::debug!(%id, expires_at, "approved application with invite");
        Ok(())
    }

    async fn record_invite(&self, id: ApplicationId, code: &str, expires_at: i64) -> Result<()> {
        let mut inner = self.write()?;
        let app = inner.get_unused_in(id, ApplicationStatus::Approved)?;

        app.invite_code = Some(code.to_string());
        app.invite_expires_at = Some(expires_at);
        tracing::debug!(%id, expires_at, "recorded invite");
        Ok(())
    }

    async fn mark_used(&self, id: ApplicationId, code: &str, at: i64) -> Result<MarkUsedResult> {
        let mut inner = self.write()?;
        let app = inner.get_mut(id)?;

        if app.used {
            return Ok(MarkUsedResult::AlreadyUsed {
                used_at: app.used_at,
            });
        }
        if app.status != ApplicationStatus::Approved {
            return Ok(MarkUsedResult::NotApproved { status: app.status });
        }
        let holds = app.invite_code.as_deref().is_some_and(|stored| {
            constant_time_eq(
                normalize_code(stored).as_bytes(),
                normalize_code(code).as_bytes(),
            )
        });
        if !holds {
            return Ok(MarkUsedResult::Superseded);
        }

        app.used = true;
        app.used_at = Some(at);
        tracing::debug!(%id, "marked application used");
        Ok(MarkUsedResult::Marked)
    }
}
