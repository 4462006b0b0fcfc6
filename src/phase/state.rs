//! Display phase representation.
//!
//! Administrative status and the time-driven timeline phase form a
//! two-level state machine. [`Phase`] encodes it as a sum type so a
//! timeline phase can only exist for a live competition.

use serde::{Serialize, Serializer};

use crate::config::schema::CompetitionStatus;

/// Time-derived sub-state of a live competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelinePhase {
    /// Before the first nomination period opens
    Upcoming,
    /// Entrants may apply
    Nomination,
    /// A public voting round is open
    Voting,
    /// A judging round is open
    Judging,
    /// Between scheduled windows
    BetweenRounds,
    /// The finale has passed
    Completed,
}

impl TimelinePhase {
    /// Wire name. `Upcoming` is reported as `nomination`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming | Self::Nomination => "nomination",
            Self::Voting => "voting",
            Self::Judging => "judging",
            Self::BetweenRounds => "between-rounds",
            Self::Completed => "completed",
        }
    }

    /// Badge text for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Nomination => "Nominations open",
            Self::Voting => "Voting open",
            Self::Judging => "Judging",
            Self::BetweenRounds => "Between rounds",
            Self::Completed => "Completed",
        }
    }
}

/// What a competition should display right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not yet published
    Draft,
    /// Published, not yet live
    Publish,
    /// Live, with the timeline-derived sub-phase
    Live(TimelinePhase),
    /// Completed by status
    Completed,
    /// Archived
    Archive,
}

impl Phase {
    /// The phase for a non-live status.
    ///
    /// Returns `None` for `Live`, whose phase depends on the timeline.
    #[must_use]
    pub const fn from_status(status: CompetitionStatus) -> Option<Self> {
        match status {
            CompetitionStatus::Draft => Some(Self::Draft),
            CompetitionStatus::Publish => Some(Self::Publish),
            CompetitionStatus::Live => None,
            CompetitionStatus::Completed => Some(Self::Completed),
            CompetitionStatus::Archive => Some(Self::Archive),
        }
    }

    /// The administrative status this phase belongs to.
    #[must_use]
    pub const fn status(self) -> CompetitionStatus {
        match self {
            Self::Draft => CompetitionStatus::Draft,
            Self::Publish => CompetitionStatus::Publish,
            Self::Live(_) => CompetitionStatus::Live,
            Self::Completed => CompetitionStatus::Completed,
            Self::Archive => CompetitionStatus::Archive,
        }
    }

    /// The timeline sub-phase, for live competitions.
    #[must_use]
    pub const fn timeline_phase(self) -> Option<TimelinePhase> {
        match self {
            Self::Live(phase) => Some(phase),
            _ => None,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live(phase) => phase.as_str(),
            other => other.status().as_str(),
        }
    }

    /// Badge text for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Publish => "Published",
            Self::Live(phase) => phase.label(),
            Self::Completed => "Completed",
            Self::Archive => "Archived",
        }
    }

    /// Whether the vote button should be shown.
    #[must_use]
    pub const fn accepts_votes(self) -> bool {
        matches!(self, Self::Live(TimelinePhase::Voting))
    }

    /// Whether new entries may be submitted.
    #[must_use]
    pub const fn accepts_nominations(self) -> bool {
        matches!(self, Self::Live(TimelinePhase::Nomination))
    }

    /// Whether the competition is over, by status or by timeline.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Live(TimelinePhase::Completed))
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_round_trips_except_live() {
        for status in [
            CompetitionStatus::Draft,
            CompetitionStatus::Publish,
            CompetitionStatus::Completed,
            CompetitionStatus::Archive,
        ] {
            assert_eq!(Phase::from_status(status).unwrap().status(), status);
        }
        assert!(Phase::from_status(CompetitionStatus::Live).is_none());
    }

    #[test]
    fn test_upcoming_reports_as_nomination() {
        let phase = Phase::Live(TimelinePhase::Upcoming);
        assert_eq!(phase.as_str(), "nomination");
        assert_eq!(phase.label(), "Upcoming");
        assert!(!phase.accepts_nominations());
    }

    #[test]
    fn test_only_voting_accepts_votes() {
        assert!(Phase::Live(TimelinePhase::Voting).accepts_votes());
        assert!(!Phase::Live(TimelinePhase::Judging).accepts_votes());
        assert!(!Phase::Publish.accepts_votes());
    }

    #[test]
    fn test_finished_by_status_or_timeline() {
        assert!(Phase::Completed.is_finished());
        assert!(Phase::Live(TimelinePhase::Completed).is_finished());
        assert!(!Phase::Live(TimelinePhase::BetweenRounds).is_finished());
    }

    #[test]
    fn test_serializes_as_wire_name() {
        let json = serde_json::to_string(&Phase::Live(TimelinePhase::BetweenRounds)).unwrap();
        assert_eq!(json, "\"between-rounds\"");
        assert_eq!(Phase::Archive.to_string(), "archive");
    }
}
