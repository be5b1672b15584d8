//! # PASU Invite Store
//!
//! The Application Store interface the invite workflows depend on, plus an
//! in-memory implementation.
//!
//! ## Overview
//!
//! Partner applications live in a hosted relational database. The workflows
//! only need a handful of operations on them, captured by the
//! [`ApplicationStore`] trait. [`MemoryStore`] implements it for tests and
//! local development.
//!
//! ## Key Types
//!
//! - [`ApplicationStore`] - The async trait for application persistence
//! - [`MemoryStore`] - In-memory storage
//! - [`Application`] - One partner application and its invite state
//! - [`MarkUsedResult`] - Outcome of the conditional "mark used" update
//!
//! ## Design Notes
//!
//! - **One application per email**: emails are stored canonicalized and are unique.
//! - **Conditional writes**: `approve_with_invite`, `record_invite` and
//!   `mark_used` check status and use inside the same write, so a concurrent
//!   review or signup cannot slip between the check and the update.
//! - **Redemption binds the code**: `mark_used` only succeeds once, and only
//!   for the code currently stored on an approved application.
//! - **Invite state is replaced, never patched**: code and expiry are always
//!   written together.

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::{ApplicationStore, MarkUsedResult};
pub use types::{Application, ApplicationId, ApplicationStatus, NewApplication};
