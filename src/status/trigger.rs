//! Time-driven status transitions.
//!
//! Two transitions happen without an administrator: `publish → live` once
//! nominations open, and `live → completed` once the finale has passed.
//! Detection is pure; the caller persists the new status when a trigger
//! fires. Re-evaluating after the write yields [`TriggerResult::NotMet`]
//! because the status no longer matches.

use chrono::{DateTime, Utc};

use crate::config::schema::{Competition, CompetitionStatus};
use crate::phase::Timeline;

/// Result of evaluating the auto-transition triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerResult {
    /// A transition is due
    Fired {
        /// Status to persist
        to: CompetitionStatus,
        /// Human-readable reason
        reason: String,
    },
    /// Nothing to do
    NotMet,
}

impl TriggerResult {
    /// The target status, if fired.
    #[must_use]
    pub const fn target(&self) -> Option<CompetitionStatus> {
        match self {
            Self::Fired { to, .. } => Some(*to),
            Self::NotMet => None,
        }
    }
}

/// The instant nominations open: the settings override, then the flat
/// field, then the earliest configured period start.
#[must_use]
pub fn nominations_open_at(
    competition: &Competition,
    timeline: &Timeline,
) -> Option<DateTime<Utc>> {
    competition
        .nomination_start()
        .or_else(|| timeline.earliest_period_start())
}

/// Whether a published competition should go live at `now`.
#[must_use]
pub fn should_auto_transition_to_live(
    competition: &Competition,
    timeline: &Timeline,
    now: DateTime<Utc>,
) -> bool {
    competition.status == CompetitionStatus::Publish
        && nominations_open_at(competition, timeline).is_some_and(|start| start <= now)
}

/// Whether a live competition should be completed at `now`.
#[must_use]
pub fn should_auto_transition_to_completed(
    competition: &Competition,
    timeline: &Timeline,
    now: DateTime<Utc>,
) -> bool {
    competition.status == CompetitionStatus::Live
        && timeline.finale().is_some_and(|finale| finale.date <= now)
}

/// Evaluates both triggers against the stored status.
///
/// At most one transition fires per evaluation: a published competition
/// whose finale has also passed goes live first and completes on the next
/// evaluation.
#[must_use]
pub fn evaluate_auto_transition(
    competition: &Competition,
    timeline: &Timeline,
    now: DateTime<Utc>,
) -> TriggerResult {
    if should_auto_transition_to_live(competition, timeline, now) {
        let reason = nominations_open_at(competition, timeline).map_or_else(
            || "nominations opened".to_string(),
            |start| format!("nominations opened at {}", start.to_rfc3339()),
        );
        return TriggerResult::Fired {
            to: CompetitionStatus::Live,
            reason,
        };
    }

    if should_auto_transition_to_completed(competition, timeline, now) {
        let reason = timeline.finale().map_or_else(
            || "finale passed".to_string(),
            |finale| format!("finale '{}' passed", finale.title),
        );
        return TriggerResult::Fired {
            to: CompetitionStatus::Completed,
            reason,
        };
    }

    TriggerResult::NotMet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CompetitionSettings, Finale, NominationPeriod, TimelineConfig};
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn published(start: DateTime<Utc>) -> Competition {
        Competition {
            id: "spring".to_string(),
            status: CompetitionStatus::Publish,
            nomination_start: Some(start),
            ..Default::default()
        }
    }

    fn timeline(competition: &Competition, config: &TimelineConfig) -> Timeline {
        Timeline::new(competition, config)
    }

    #[test]
    fn test_goes_live_once_start_has_passed() {
        let now = Utc::now();
        let config = TimelineConfig::default();

        let started = published(now - Duration::days(1));
        assert!(should_auto_transition_to_live(
            &started,
            &timeline(&started, &config),
            now
        ));

        let pending = published(now + Duration::days(1));
        assert!(!should_auto_transition_to_live(
            &pending,
            &timeline(&pending, &config),
            now
        ));
    }

    #[test]
    fn test_start_instant_is_inclusive() {
        let now = at("2026-01-01T00:00:00Z");
        let c = published(now);
        assert!(should_auto_transition_to_live(
            &c,
            &timeline(&c, &TimelineConfig::default()),
            now
        ));
    }

    #[test]
    fn test_settings_override_decides_start() {
        let now = at("2026-01-10T00:00:00Z");
        let c = Competition {
            settings: Some(CompetitionSettings {
                nomination_start: Some(at("2026-01-20T00:00:00Z")),
                nomination_end: None,
            }),
            ..published(at("2026-01-01T00:00:00Z"))
        };
        assert!(!should_auto_transition_to_live(
            &c,
            &timeline(&c, &TimelineConfig::default()),
            now
        ));
    }

    #[test]
    fn test_period_start_used_without_flat_fields() {
        let c = Competition {
            nomination_start: None,
            ..published(at("2026-01-01T00:00:00Z"))
        };
        let config = TimelineConfig {
            nomination_periods: vec![
                NominationPeriod {
                    order_index: 1,
                    start: Some(at("2026-02-01T00:00:00Z")),
                    ..Default::default()
                },
                NominationPeriod {
                    order_index: 0,
                    start: Some(at("2026-01-05T00:00:00Z")),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let t = timeline(&c, &config);
        assert!(!should_auto_transition_to_live(&c, &t, at("2026-01-04T00:00:00Z")));
        assert!(should_auto_transition_to_live(&c, &t, at("2026-01-05T00:00:00Z")));
    }

    #[test]
    fn test_only_publish_goes_live() {
        let now = at("2026-02-01T00:00:00Z");
        for status in [
            CompetitionStatus::Draft,
            CompetitionStatus::Live,
            CompetitionStatus::Archive,
        ] {
            let c = Competition {
                status,
                ..published(at("2026-01-01T00:00:00Z"))
            };
            assert!(!should_auto_transition_to_live(
                &c,
                &timeline(&c, &TimelineConfig::default()),
                now
            ));
        }
    }

    #[test]
    fn test_completes_after_finale() {
        let c = Competition {
            status: CompetitionStatus::Live,
            ..Default::default()
        };
        let config = TimelineConfig {
            finale: Some(Finale {
                title: "Gala".to_string(),
                date: at("2026-03-01T00:00:00Z"),
            }),
            ..Default::default()
        };
        let t = timeline(&c, &config);
        assert!(!should_auto_transition_to_completed(&c, &t, at("2026-02-28T23:59:59Z")));
        assert!(should_auto_transition_to_completed(&c, &t, at("2026-03-01T00:00:00Z")));

        let result = evaluate_auto_transition(&c, &t, at("2026-03-02T00:00:00Z"));
        assert_eq!(
            result,
            TriggerResult::Fired {
                to: CompetitionStatus::Completed,
                reason: "finale 'Gala' passed".to_string(),
            }
        );
    }

    #[test]
    fn test_no_finale_never_completes() {
        let c = Competition {
            status: CompetitionStatus::Live,
            ..Default::default()
        };
        let t = timeline(&c, &TimelineConfig::default());
        assert!(!should_auto_transition_to_completed(&c, &t, Utc::now()));
    }

    #[test]
    fn test_evaluation_is_idempotent_until_persisted() {
        let now = at("2026-04-01T00:00:00Z");
        let mut c = Competition {
            finale_date: Some(at("2026-03-01T00:00:00Z")),
            ..published(at("2026-01-01T00:00:00Z"))
        };
        let config = TimelineConfig::default();

        let first = evaluate_auto_transition(&c, &timeline(&c, &config), now);
        let second = evaluate_auto_transition(&c, &timeline(&c, &config), now);
        assert_eq!(first, second);
        // Does not chain straight to completed
        assert_eq!(first.target(), Some(CompetitionStatus::Live));

        c.status = CompetitionStatus::Live;
        assert!(!should_auto_transition_to_live(&c, &timeline(&c, &config), now));
        let next = evaluate_auto_transition(&c, &timeline(&c, &config), now);
        assert_eq!(next.target(), Some(CompetitionStatus::Completed));

        c.status = CompetitionStatus::Completed;
        assert_eq!(
            evaluate_auto_transition(&c, &timeline(&c, &config), now),
            TriggerResult::NotMet
        );
    }
}
