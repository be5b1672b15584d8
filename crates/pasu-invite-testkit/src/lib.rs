//! # PASU Invite Testkit
//!
//! Testing utilities for PASU invites.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed secret, email and clock inputs with the exact code they must produce
//! - **Generators**: Proptest strategies for emails, validity windows and timestamps
//! - **Fixtures**: A wired-up portal on a manual clock with a recording notifier
//!
//! ## Golden Vectors
//!
//! ```rust
//! use pasu_invite_testkit::vectors::{all_vectors, issue_from_vector};
//!
//! for vector in all_vectors() {
//!     let code = issue_from_vector(&vector);
//!     assert_eq!(code.to_string(), vector.expected_code, "{}", vector.name);
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use pasu_invite_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let code = fixture.service().issue("partner@example.com", 7);
//! fixture.clock.advance_days(8);
//! assert!(fixture.service().verify(&code, "partner@example.com").is_err());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{ManualClock, RecordingNotifier, TestFixture, FIXTURE_EPOCH, FIXTURE_SECRET};
pub use generators::{email, mixed_case, timestamp, validity_days};
pub use vectors::{all_vectors, issue_from_vector, verify_all_vectors, GoldenVector};
