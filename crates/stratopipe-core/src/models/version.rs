use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Review status a version moves through on its way to publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    Placeholder,
    ReadyToStart,
    WorkInProgress,
    Kickback,
    ReadyForReview,
    Approved,
    Published,
}

impl VersionStatus {
    pub const ALL: [VersionStatus; 7] = [
        VersionStatus::Placeholder,
        VersionStatus::ReadyToStart,
        VersionStatus::WorkInProgress,
        VersionStatus::Kickback,
        VersionStatus::ReadyForReview,
        VersionStatus::Approved,
        VersionStatus::Published,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::Placeholder => "placeholder",
            VersionStatus::ReadyToStart => "ready_to_start",
            VersionStatus::WorkInProgress => "work_in_progress",
            VersionStatus::Kickback => "kickback",
            VersionStatus::ReadyForReview => "ready_for_review",
            VersionStatus::Approved => "approved",
            VersionStatus::Published => "published",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            VersionStatus::Placeholder => "placeholder",
            VersionStatus::ReadyToStart => "ready to start",
            VersionStatus::WorkInProgress => "work in progress",
            VersionStatus::Kickback => "kickback",
            VersionStatus::ReadyForReview => "ready for review",
            VersionStatus::Approved => "approved",
            VersionStatus::Published => "published",
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown version status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for VersionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!("kickback".parse::<VersionStatus>(), Ok(VersionStatus::Kickback));
        assert_eq!(
            "ready_for_review".parse::<VersionStatus>(),
            Ok(VersionStatus::ReadyForReview)
        );
        assert_eq!(
            "done".parse::<VersionStatus>(),
            Err(UnknownStatus("done".to_string()))
        );
    }

    #[test]
    fn test_serde_matches_wire_values() {
        for status in VersionStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(VersionStatus::ReadyToStart.label(), "ready to start");
    }
}
