//! Partner application records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a partner application row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app#{}", self.0)
    }
}

impl From<u64> for ApplicationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Allowed review transitions.
    ///
    /// Pending can be approved or rejected; an approved application can
    /// still be rejected (revoked) until it is used. Rejection is final.
    pub fn can_transition_to(&self, to: ApplicationStatus) -> bool {
        matches!(
            (self, to),
            (ApplicationStatus::Pending, ApplicationStatus::Approved)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
                | (ApplicationStatus::Approved, ApplicationStatus::Rejected)
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

/// Fields supplied when a partner submits an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub email: String,
    pub company: String,
    pub contact_name: String,
}

impl NewApplication {
    pub fn new(
        email: impl Into<String>,
        company: impl Into<String>,
        contact_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            company: company.into(),
            contact_name: contact_name.into(),
        }
    }
}

/// A partner application and its invite state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    /// Canonical (lowercased, trimmed) email. Unique across applications.
    pub email: String,
    pub company: String,
    pub contact_name: String,
    pub status: ApplicationStatus,
    /// Wire form of the current invite code, if one has been issued.
    pub invite_code: Option<String>,
    /// Expiry of the current invite code (Unix ms).
    pub invite_expires_at: Option<i64>,
    pub used: bool,
    /// When the invite was redeemed (Unix ms).
    pub used_at: Option<i64>,
    pub created_at: i64,
    /// When the status last changed (Unix ms).
    pub reviewed_at: Option<i64>,
}

impl Application {
    /// Whether the stored invite expiry has passed. No invite counts as expired.
    pub fn invite_expired_at(&self, now: i64) -> bool {
        match self.invite_expires_at {
            Some(expires_at) => now > expires_at,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use ApplicationStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Rejected));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Rejected.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_string_roundtrip() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
        assert!("used".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ApplicationStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }

    #[test]
    fn test_application_id_display() {
        assert_eq!(ApplicationId(42).to_string(), "app#42");
    }
}
