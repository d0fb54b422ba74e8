use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Stage of a task on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    Pending,
    InProgress,
    Review,
    Completed,
    Verified,
    Cancelled,
}

impl Status {
    /// Every status in workflow order
    pub const ALL: [Status; 7] = [
        Self::Todo,
        Self::Pending,
        Self::InProgress,
        Self::Review,
        Self::Completed,
        Self::Verified,
        Self::Cancelled,
    ];

    /// Wire value, as carried in markup attributes and the move request body
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Completed => "completed",
            Self::Verified => "verified",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Completed => "Completed",
            Self::Verified => "Verified",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Statuses no task leaves once reached
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified | Self::Cancelled)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Status {
    type Err = crate::error::BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| crate::error::BoardError::InvalidStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(Status::from_str("todo").unwrap(), Status::Todo);
        assert_eq!(Status::from_str("in_progress").unwrap(), Status::InProgress);
        assert_eq!(Status::from_str("In-Progress").unwrap(), Status::InProgress);
        assert_eq!(Status::from_str(" REVIEW ").unwrap(), Status::Review);
        assert!(Status::from_str("archived").is_err());
        assert!(Status::from_str("").is_err());
    }

    #[test]
    fn test_status_wire_value_round_trips_through_serde() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        for status in Status::ALL {
            assert_eq!(Status::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_display_uses_label() {
        assert_eq!(Status::InProgress.to_string(), "In Progress");
        assert_eq!(Status::Todo.to_string(), "To Do");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(Status::Verified.is_terminal());
        assert!(Status::Cancelled.is_terminal());
        assert!(!Status::Completed.is_terminal());
    }
}
