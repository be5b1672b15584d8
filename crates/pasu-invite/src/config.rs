//! Portal configuration, loaded once at startup.

use pasu_invite_core::{SecretKey, DEFAULT_SECRET_VAR};

use crate::error::ConfigError;
use crate::policy::ValidityPolicy;

/// Environment variable holding the invite signing secret. Required.
pub const SECRET_VAR: &str = DEFAULT_SECRET_VAR;

/// Environment variable overriding the default validity in days. Optional.
pub const VALIDITY_DAYS_VAR: &str = "INVITE_VALIDITY_DAYS";

/// Configuration for the invite portal.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Shared HMAC secret. Immutable for the life of the process.
    pub secret: SecretKey,
    /// Validity window and default.
    pub validity: ValidityPolicy,
}

impl PortalConfig {
    /// Configuration with an explicit secret and the standard policy.
    pub fn new(secret: SecretKey) -> Self {
        Self {
            secret,
            validity: ValidityPolicy::default(),
        }
    }

    /// Load from the process environment.
    ///
    /// A missing `INVITE_CODE_SECRET` is an error here, so the process
    /// refuses to start rather than issuing codes it can't sign.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = SecretKey::from_lookup(SECRET_VAR, |var| lookup(var).map(String::into_bytes))?;

        let validity = match lookup(VALIDITY_DAYS_VAR) {
            None => ValidityPolicy::default(),
            Some(raw) => parse_validity(&raw)?,
        };

        Ok(Self { secret, validity })
    }
}

fn parse_validity(raw: &str) -> Result<ValidityPolicy, ConfigError> {
    let invalid = || ConfigError::InvalidValidityDays {
        var: VALIDITY_DAYS_VAR,
        value: raw.to_string(),
        min: ValidityPolicy::MIN_DAYS,
        max: ValidityPolicy::MAX_DAYS,
    };
    let days = raw.trim().parse::<u32>().map_err(|_| invalid())?;
    ValidityPolicy::with_default(days).map_err(|_| invalid())
}
