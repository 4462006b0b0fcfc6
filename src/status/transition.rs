//! Administrator-initiated status transitions.
//!
//! Checks are pure and never fail: a refused change is reported with a
//! reason string that the editor shows verbatim.

use serde::Serialize;

use crate::config::schema::{Competition, CompetitionStatus};
use crate::phase::Timeline;

/// Outcome of checking a requested status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum TransitionCheck {
    /// The change may be persisted
    Allowed,
    /// The change is refused, with the reason
    Refused(String),
}

impl TransitionCheck {
    /// Whether the change may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// The refusal reason, if refused.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed => None,
            Self::Refused(reason) => Some(reason),
        }
    }
}

/// Checks whether `competition` may move to status `to`.
///
/// Rules, in order:
/// - requesting the current status is a no-op and always allowed
/// - an archived competition can only be restored to draft
/// - a completed competition can only be archived
/// - only a live competition can be completed by hand
/// - publishing needs a city/venue context
/// - going live needs a nomination window with both a start and an end
///   (a period, or the legacy flat fields)
#[must_use]
pub fn check_transition(
    competition: &Competition,
    timeline: &Timeline,
    to: CompetitionStatus,
) -> TransitionCheck {
    use CompetitionStatus::{Archive, Completed, Draft, Live, Publish};

    let from = competition.status;
    if from == to {
        return TransitionCheck::Allowed;
    }

    match (from, to) {
        (Archive, Draft) | (_, Archive) => TransitionCheck::Allowed,
        (Archive, _) => refuse("archived competitions can only be restored to draft"),
        (Completed, _) => refuse(
            "a completed competition cannot be reactivated; create a new season instead",
        ),
        (Draft | Publish, Completed) => refuse("only a live competition can be completed"),
        (_, Publish) if !competition.has_venue() => {
            refuse("assign a city or venue before publishing")
        }
        (_, Live) if !has_nomination_window(competition, timeline) => refuse(
            "going live requires a nomination period with both a start and an end date",
        ),
        _ => TransitionCheck::Allowed,
    }
}

fn has_nomination_window(competition: &Competition, timeline: &Timeline) -> bool {
    timeline.has_bounded_period()
        || (competition.nomination_start().is_some() && competition.nomination_end().is_some())
}

fn refuse(reason: &str) -> TransitionCheck {
    TransitionCheck::Refused(reason.to_string())
}
