//! Cryptographic primitives for invite codes.
//!
//! Wraps HMAC-SHA256 and constant-time comparison with strong types.

use std::fmt;

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::KeyError;

type HmacSha256 = Hmac<Sha256>;

/// Environment variable the secret is read from by default.
pub const DEFAULT_SECRET_VAR: &str = "INVITE_CODE_SECRET";

/// Length of an HMAC-SHA256 tag in bytes.
pub const SIGNATURE_LEN: usize = 32;

/// The shared secret used to sign and verify invite codes.
///
/// Loaded once at startup and never mutated. The bytes are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Create from raw bytes. Empty secrets are rejected.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(KeyError::EmptySecret);
        }
        Ok(Self(bytes))
    }

    /// Read the secret from an environment variable.
    ///
    /// Intended to be called once during process start. A missing or empty
    /// variable is an error so a misconfigured deployment never boots.
    pub fn from_env(var: &str) -> Result<Self, KeyError> {
        Self::from_lookup(var, |name| {
            std::env::var_os(name).map(|value| value.into_encoded_bytes())
        })
    }

    /// Read the secret named `var` through an arbitrary lookup.
    pub fn from_lookup<F>(var: &str, lookup: F) -> Result<Self, KeyError>
    where
        F: FnOnce(&str) -> Option<Vec<u8>>,
    {
        let value = lookup(var).ok_or_else(|| KeyError::MissingSecret {
            var: var.to_string(),
        })?;
        Self::new(value)
    }

    /// Generate a random 32-byte secret.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; empty secrets cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(<{} bytes redacted>)", self.0.len())
    }
}

/// A 32-byte HMAC-SHA256 tag over an invite payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InviteSignature(pub [u8; SIGNATURE_LEN]);

impl InviteSignature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Constant-time check against untrusted tag bytes of any length.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        constant_time_eq(&self.0, candidate)
    }
}

impl fmt::Debug for InviteSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InviteSig({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for InviteSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SIGNATURE_LEN]> for InviteSignature {
    fn from(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }
}

/// A keyed HMAC-SHA256 instance, ready to sign payloads.
///
/// Keying happens once; each signature clones the keyed state.
#[derive(Clone)]
pub struct InviteSigner {
    mac: HmacSha256,
}

impl InviteSigner {
    /// Key a signer from the shared secret.
    pub fn new(secret: &SecretKey) -> Result<Self, KeyError> {
        let mac = <HmacSha256 as Mac>::new_from_slice(secret.expose())
            .map_err(|_| KeyError::InvalidLength(secret.len()))?;
        Ok(Self { mac })
    }

    /// Compute the tag over the exact payload bytes.
    pub fn sign(&self, payload: &[u8]) -> InviteSignature {
        let mut mac = self.mac.clone();
        mac.update(payload);
        InviteSignature(mac.finalize().into_bytes().into())
    }
}

impl fmt::Debug for InviteSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InviteSigner(HMAC-SHA256)")
    }
}

/// Compare two byte strings without short-circuiting on the first mismatch.
///
/// Lengths are compared first (length is public); only equal-length inputs
/// go through the constant-time equality.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
