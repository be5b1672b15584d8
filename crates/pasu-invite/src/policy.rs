//! Validity window policy for issued invites.

use crate::error::{PortalError, Result};

/// Allowed invite validity, in days.
///
/// The code layer accepts any day count; this is where the portal's window
/// is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityPolicy {
    pub min_days: u32,
    pub max_days: u32,
    pub default_days: u32,
}

impl ValidityPolicy {
    pub const MIN_DAYS: u32 = 1;
    pub const MAX_DAYS: u32 = 90;
    pub const DEFAULT_DAYS: u32 = 7;

    /// Policy with a different default inside the standard window.
    pub fn with_default(default_days: u32) -> Result<Self> {
        let policy = Self::default();
        policy.check(default_days)?;
        Ok(Self {
            default_days,
            ..policy
        })
    }

    /// Accept `days` if it lies within the window.
    pub fn check(&self, days: u32) -> Result<u32> {
        if (self.min_days..=self.max_days).contains(&days) {
            Ok(days)
        } else {
            Err(PortalError::InvalidValidity {
                days,
                min: self.min_days,
                max: self.max_days,
            })
        }
    }

    /// The requested day count, or the default when none is given.
    pub fn resolve(&self, requested: Option<u32>) -> Result<u32> {
        self.check(requested.unwrap_or(self.default_days))
    }
}

impl Default for ValidityPolicy {
    fn default() -> Self {
        Self {
            min_days: Self::MIN_DAYS,
            max_days: Self::MAX_DAYS,
            default_days: Self::DEFAULT_DAYS,
        }
    }
}
