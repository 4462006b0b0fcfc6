//! Phase resolution.
//!
//! Derives a competition's display phase from its status, the current
//! instant, and its timeline. Pure: no I/O, no clock reads, no mutation.
//!
//! Resolution order for a live competition:
//!
//! 1. finale passed
//! 2. an open round (first match in order)
//! 3. an open nomination period
//! 4. before the first period
//! 5. after nominations, before the first round (or with no rounds)
//! 6. in the gap between two consecutive rounds
//! 7. after the last round
//! 8. nomination
//!
//! A window missing either bound never matches, so malformed rows fall
//! through to the later checks instead of failing the computation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::schema::{Competition, RoundKind, TimelineConfig};

use super::state::{Phase, TimelinePhase};
use super::timeline::{Segment, Timeline};

/// Resolves the display phase of a competition at `now`.
///
/// Statuses other than `live` are returned unchanged; the timeline is
/// only consulted for live competitions.
#[must_use]
pub fn resolve_phase(competition: &Competition, timeline: &Timeline, now: DateTime<Utc>) -> Phase {
    Phase::from_status(competition.status)
        .unwrap_or_else(|| Phase::Live(resolve_timeline_phase(timeline, now)))
}

/// Builds the timeline from stored collections and resolves the phase.
#[must_use]
pub fn resolve_phase_from_config(
    competition: &Competition,
    config: &TimelineConfig,
    now: DateTime<Utc>,
) -> Phase {
    resolve_phase(competition, &Timeline::new(competition, config), now)
}

/// Resolves the time-driven sub-phase of a live competition.
#[must_use]
pub fn resolve_timeline_phase(timeline: &Timeline, now: DateTime<Utc>) -> TimelinePhase {
    // A passed finale wins over everything, including malformed rounds
    if timeline.finale().is_some_and(|finale| now >= finale.date) {
        return TimelinePhase::Completed;
    }

    let windows = timeline.windows();

    for segment in windows {
        if let Segment::Round { round, .. } = segment {
            if segment.contains(now) {
                return match round.kind {
                    RoundKind::Voting => TimelinePhase::Voting,
                    RoundKind::Judging => TimelinePhase::Judging,
                };
            }
        }
    }

    if windows
        .iter()
        .any(|s| matches!(s, Segment::Nomination { .. }) && s.contains(now))
    {
        return TimelinePhase::Nomination;
    }

    let mut periods = timeline.periods();
    let first_period = periods.next();
    let last_period = periods.next_back().or(first_period);

    if first_period
        .and_then(|p| p.start)
        .is_some_and(|start| now < start)
    {
        return TimelinePhase::Upcoming;
    }

    // Flat legacy fields cannot describe rounds
    if timeline.is_legacy() {
        return TimelinePhase::Nomination;
    }

    let first_round_start = timeline.rounds().next().map(|r| r.start);
    if let Some(last_end) = last_period.and_then(|p| p.end) {
        let before_rounds = match first_round_start {
            None => true,
            Some(start) => start.is_some_and(|start| now < start),
        };
        if now >= last_end && before_rounds {
            return TimelinePhase::BetweenRounds;
        }
    }

    let rounds: Vec<_> = timeline.rounds().collect();
    for pair in rounds.windows(2) {
        if let (Some(end), Some(next_start)) = (pair[0].end, pair[1].start) {
            if end <= now && now < next_start {
                return TimelinePhase::BetweenRounds;
            }
        }
    }

    if rounds
        .last()
        .and_then(|r| r.end)
        .is_some_and(|last_end| now >= last_end)
    {
        return TimelinePhase::BetweenRounds;
    }

    TimelinePhase::Nomination
}

/// Phase plus the context a status badge needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
    /// Stored administrative status
    pub status: String,
    /// Resolved phase
    pub phase: Phase,
    /// Badge text
    pub label: String,
    /// Whether voting is open
    pub accepts_votes: bool,
    /// Whether nominations are open
    pub accepts_nominations: bool,
    /// Title of the open round, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_round: Option<String>,
    /// Next scheduled boundary after the evaluated instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_boundary: Option<DateTime<Utc>>,
    /// Instant the phase was evaluated at
    pub evaluated_at: DateTime<Utc>,
}

impl PhaseReport {
    /// Resolves the phase and gathers display context.
    #[must_use]
    pub fn build(competition: &Competition, timeline: &Timeline, now: DateTime<Utc>) -> Self {
        let phase = resolve_phase(competition, timeline, now);
        let live = phase.timeline_phase().is_some();
        Self {
            status: competition.status.to_string(),
            phase,
            label: phase.label().to_string(),
            accepts_votes: phase.accepts_votes(),
            accepts_nominations: phase.accepts_nominations(),
            active_round: timeline
                .active_round(now)
                .filter(|_| live)
                .map(|r| r.title.clone()),
            next_boundary: if live && !phase.is_finished() {
                timeline.next_boundary(now)
            } else {
                None
            },
            evaluated_at: now,
        }
    }
}
