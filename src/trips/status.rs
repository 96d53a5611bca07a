use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Lifecycle of a trip. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ride_status")]
pub enum RideStatus {
    Requested,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub const ALL: [RideStatus; 4] = [
        RideStatus::Requested,
        RideStatus::InProgress,
        RideStatus::Completed,
        RideStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RideStatus::Requested => "Requested",
            RideStatus::InProgress => "InProgress",
            RideStatus::Completed => "Completed",
            RideStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RideStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ApiError::bad_request(format!("Unknown ride status '{s}'")))
    }
}

/// The moves a trip can make after it is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Accept,
    Complete,
    Cancel,
}

impl Transition {
    pub fn sources(self) -> &'static [RideStatus] {
        match self {
            Transition::Accept => &[RideStatus::Requested],
            Transition::Complete => &[RideStatus::InProgress],
            Transition::Cancel => &[RideStatus::Requested, RideStatus::InProgress],
        }
    }

    pub fn target(self) -> RideStatus {
        match self {
            Transition::Accept => RideStatus::InProgress,
            Transition::Complete => RideStatus::Completed,
            Transition::Cancel => RideStatus::Cancelled,
        }
    }

    pub fn rejection(self) -> &'static str {
        match self {
            Transition::Accept => "Trip is not available for acceptance",
            Transition::Complete => "Only trips in progress can be completed",
            Transition::Cancel => "Trip can no longer be cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn can_move(from: RideStatus, to: RideStatus) -> bool {
        [Transition::Accept, Transition::Complete, Transition::Cancel]
            .iter()
            .any(|t| t.target() == to && t.sources().contains(&from))
    }

    #[test]
    fn lifecycle_moves() {
        use RideStatus::*;
        assert!(can_move(Requested, InProgress));
        assert!(can_move(Requested, Cancelled));
        assert!(can_move(InProgress, Completed));
        assert!(can_move(InProgress, Cancelled));
        assert!(!can_move(Requested, Completed));
        assert!(!can_move(InProgress, Requested));
    }

    #[test]
    fn terminal_states_go_nowhere() {
        for from in [RideStatus::Completed, RideStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in RideStatus::ALL {
                assert!(!can_move(from, to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn parses_path_segments() {
        assert_eq!("InProgress".parse::<RideStatus>().unwrap(), RideStatus::InProgress);
        assert_eq!("completed".parse::<RideStatus>().unwrap(), RideStatus::Completed);
        let err = "Flying".parse::<RideStatus>().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn wire_names_match_database_labels() {
        for status in RideStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
