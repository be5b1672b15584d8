//! # PASU Invite
//!
//! Signed, time-limited, email-bound invite codes that gate partner
//! self-service signup, and the two workflows built on them.
//!
//! ## Overview
//!
//! - **Review**: an admin approves a pending partner application; the portal
//!   issues a code, stores it with its expiry, and hands it to the notifier.
//! - **Signup**: a partner presents their email and code; the portal verifies
//!   the code, then confirms against the store that the application is
//!   approved, unused, unexpired, and still holds this exact code.
//!
//! The code itself only proves authenticity and non-expiry of an
//! `(email, expires_at)` pair. Single use lives in the store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pasu_invite::{InvitePortal, PortalConfig, TracingNotifier};
//! use pasu_invite::store::{MemoryStore, NewApplication};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     // Fails at boot if INVITE_CODE_SECRET is unset
//!     let config = PortalConfig::from_env()?;
//!     let portal = InvitePortal::new(&config, MemoryStore::new(), TracingNotifier)?;
//!
//!     let id = portal
//!         .submit(NewApplication::new("hr@acme.example", "Acme", "Dana Reyes"))
//!         .await?;
//!     let issued = portal.approve(id, None).await?;
//!
//!     let signup = portal.check_signup("hr@acme.example", &issued.code).await?;
//!     // ... create the account for signup.email, then:
//!     portal.complete_signup(&signup).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `pasu_invite::core` - Codes, signing, verification
//! - `pasu_invite::store` - Application store interface

pub mod config;
pub mod error;
pub mod notify;
pub mod policy;
pub mod portal;

// Re-export component crates
pub use pasu_invite_core as core;
pub use pasu_invite_store as store;

pub use config::{PortalConfig, SECRET_VAR, VALIDITY_DAYS_VAR};
pub use error::{ConfigError, PortalError, Result, SignupError};
pub use notify::{InviteNotice, Notifier, NotifyError, TracingNotifier};
pub use policy::ValidityPolicy;
pub use portal::{ApprovedSignup, InvitePortal, IssuedInvite};

// Re-export commonly used core types
pub use pasu_invite_core::{
    inspect, Clock, FixedClock, InviteClaims, InviteCode, InviteCodeService, InviteError,
    KeyError, SecretKey, SystemClock,
};
