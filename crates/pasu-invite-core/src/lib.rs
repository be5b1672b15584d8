//! # PASU Invite Core
//!
//! Pure primitives for signed, time-limited, email-bound invitation codes.
//!
//! This crate contains no storage and no networking. The only environment
//! access is the one-time secret lookup in [`SecretKey::from_env`], which
//! happens at construction so a missing secret is caught at boot.
//!
//! ## Key Types
//!
//! - [`InviteCodeService`] - `issue`, `verify` and `inspect`
//! - [`InviteCode`] - A freshly issued code, rendered to its wire form via `Display`
//! - [`InviteClaims`] - The `(email, expires_at)` pair a code carries
//! - [`InviteError`] - One variant per rejection reason
//! - [`SecretKey`] - The shared HMAC secret, zeroized on drop
//!
//! ## Wire Format
//!
//! ```text
//! PASU-<base64url(payload)>::<base64url(signature)>
//! payload   = "<lowercased-trimmed-email>|<expiryEpochMillis>"
//! signature = HMAC-SHA256(secret, payload_bytes)
//! ```
//!
//! See the [`canonical`] module for the encoding helpers.
//!
//! ## Usage
//!
//! ```rust
//! use pasu_invite_core::{InviteCodeService, SecretKey};
//!
//! let secret = SecretKey::new(b"local-development-secret".to_vec()).unwrap();
//! let service = InviteCodeService::new(&secret).unwrap();
//!
//! let code = service.issue("Partner@Example.com", 7);
//! let claims = service.verify(&code, "partner@example.com").unwrap();
//! assert_eq!(claims.email, "partner@example.com");
//! ```

pub mod canonical;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod service;
pub mod types;

pub use canonical::{
    canonical_email, normalize_code, payload_bytes, CODE_PREFIX, DAY_MILLIS, PAYLOAD_DELIMITER,
    SIGNATURE_DELIMITER,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use crypto::{constant_time_eq, InviteSignature, InviteSigner, SecretKey, DEFAULT_SECRET_VAR};
pub use error::{InviteError, KeyError};
pub use service::{inspect, InviteCodeService};
pub use types::{InviteClaims, InviteCode};
