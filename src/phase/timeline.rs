//! Ordered timeline segments.
//!
//! Periods, rounds, and the finale are stored as separate collections.
//! [`Timeline`] merges them into one ordered sequence (periods by order
//! index, then rounds by order index, then the finale) so every consumer
//! walks the same list.

use chrono::{DateTime, Utc};

use crate::config::schema::{
    Competition, Finale, NominationPeriod, TimelineConfig, VotingRound,
};

/// Where a segment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentSource {
    /// Position in the stored collection (before sorting)
    Record(usize),
    /// Synthesized from the flat competition fields
    Legacy,
}

/// One entry in the ordered timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A nomination window
    Nomination {
        /// Origin of the period
        source: SegmentSource,
        /// The period record
        period: NominationPeriod,
    },
    /// A voting or judging window
    Round {
        /// Position in the stored round collection
        source: usize,
        /// The round record
        round: VotingRound,
    },
    /// The closing instant
    Finale {
        /// Origin of the finale
        source: SegmentSource,
        /// The finale record
        finale: Finale,
    },
}

impl Segment {
    /// Start instant. The finale starts and ends at its date.
    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Nomination { period, .. } => period.start,
            Self::Round { round, .. } => round.start,
            Self::Finale { finale, .. } => Some(finale.date),
        }
    }

    /// End instant.
    #[must_use]
    pub fn end(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Nomination { period, .. } => period.end,
            Self::Round { round, .. } => round.end,
            Self::Finale { finale, .. } => Some(finale.date),
        }
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Nomination { period, .. } => &period.title,
            Self::Round { round, .. } => &round.title,
            Self::Finale { finale, .. } => &finale.title,
        }
    }

    /// Field path of the underlying record, used in validation messages.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Nomination {
                source: SegmentSource::Record(i),
                ..
            } => format!("nomination_periods[{i}]"),
            Self::Nomination {
                source: SegmentSource::Legacy,
                ..
            } => "competition.nomination".to_string(),
            Self::Round { source, .. } => format!("voting_rounds[{source}]"),
            Self::Finale {
                source: SegmentSource::Record(_),
                ..
            } => "finale".to_string(),
            Self::Finale {
                source: SegmentSource::Legacy,
                ..
            } => "competition.finale_date".to_string(),
        }
    }

    /// Short human description, e.g. `round 'Semifinal'`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Nomination { period, .. } => format!("nomination period '{}'", period.title),
            Self::Round { round, .. } => format!("round '{}'", round.title),
            Self::Finale { finale, .. } => format!("finale '{}'", finale.title),
        }
    }

    /// Whether `now` lies in `[start, end)`.
    ///
    /// A window missing either bound never matches.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => start <= now && now < end,
            _ => false,
        }
    }

    /// True for the finale entry.
    #[must_use]
    pub const fn is_finale(&self) -> bool {
        matches!(self, Self::Finale { .. })
    }
}

/// A competition's timeline as one ordered list of segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    segments: Vec<Segment>,
    legacy: bool,
}

impl Timeline {
    /// Builds the ordered timeline for a competition.
    ///
    /// When no periods or rounds are configured, a single nomination
    /// window is synthesized from the competition's flat fields (settings
    /// override first). The finale comes from the timeline collection,
    /// falling back to the flat `finale_date`; in legacy mode the flat
    /// `voting_end` is the last resort, since it is the only remaining
    /// closing instant.
    #[must_use]
    pub fn new(competition: &Competition, config: &TimelineConfig) -> Self {
        let legacy = config.uses_legacy_fields();
        let mut segments = Vec::new();

        if legacy {
            let start = competition.nomination_start();
            let end = competition.nomination_end();
            if start.is_some() || end.is_some() {
                segments.push(Segment::Nomination {
                    source: SegmentSource::Legacy,
                    period: NominationPeriod {
                        start,
                        end,
                        ..NominationPeriod::default()
                    },
                });
            }
        } else {
            let mut periods: Vec<(usize, &NominationPeriod)> =
                config.nomination_periods.iter().enumerate().collect();
            // Stable: duplicate order indices keep their stored order
            periods.sort_by_key(|(_, p)| p.order_index);
            segments.extend(periods.into_iter().map(|(i, p)| Segment::Nomination {
                source: SegmentSource::Record(i),
                period: p.clone(),
            }));

            let mut rounds: Vec<(usize, &VotingRound)> =
                config.voting_rounds.iter().enumerate().collect();
            rounds.sort_by_key(|(_, r)| r.order_index);
            segments.extend(rounds.into_iter().map(|(i, r)| Segment::Round {
                source: i,
                round: r.clone(),
            }));
        }

        let finale = config
            .finale
            .clone()
            .map(|finale| Segment::Finale {
                source: SegmentSource::Record(0),
                finale,
            })
            .or_else(|| {
                let fallback = if legacy {
                    competition.finale_date.or(competition.voting_end)
                } else {
                    competition.finale_date
                };
                fallback.map(|date| Segment::Finale {
                    source: SegmentSource::Legacy,
                    finale: Finale {
                        title: "Finale".to_string(),
                        date,
                    },
                })
            });
        segments.extend(finale);

        Self { segments, legacy }
    }

    /// All segments in sequence order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Periods and rounds, without the finale.
    #[must_use]
    pub fn windows(&self) -> &[Segment] {
        match self.segments.last() {
            Some(last) if last.is_finale() => &self.segments[..self.segments.len() - 1],
            _ => &self.segments,
        }
    }

    /// Whether the flat competition fields were used.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// Nomination periods in order.
    pub fn periods(&self) -> impl DoubleEndedIterator<Item = &NominationPeriod> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Nomination { period, .. } => Some(period),
            _ => None,
        })
    }

    /// Rounds in order.
    pub fn rounds(&self) -> impl DoubleEndedIterator<Item = &VotingRound> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Round { round, .. } => Some(round),
            _ => None,
        })
    }

    /// The finale, if one is scheduled.
    #[must_use]
    pub fn finale(&self) -> Option<&Finale> {
        self.segments.last().and_then(|s| match s {
            Segment::Finale { finale, .. } => Some(finale),
            _ => None,
        })
    }

    /// Whether any rounds are configured.
    #[must_use]
    pub fn has_rounds(&self) -> bool {
        self.rounds().next().is_some()
    }

    /// Whether the timeline defines any ending: a period end, a round
    /// end, or a finale.
    #[must_use]
    pub fn has_ending(&self) -> bool {
        self.segments.iter().any(|s| s.end().is_some())
    }

    /// Whether some nomination window has both a start and an end.
    #[must_use]
    pub fn has_bounded_period(&self) -> bool {
        self.periods().any(|p| p.start.is_some() && p.end.is_some())
    }

    /// Earliest start among the nomination periods.
    #[must_use]
    pub fn earliest_period_start(&self) -> Option<DateTime<Utc>> {
        self.periods().filter_map(|p| p.start).min()
    }

    /// The period currently accepting entries.
    #[must_use]
    pub fn open_period(&self, now: DateTime<Utc>) -> Option<&NominationPeriod> {
        self.segments.iter().find_map(|s| match s {
            Segment::Nomination { period, .. } if s.contains(now) => Some(period),
            _ => None,
        })
    }

    /// The round whose window contains `now`.
    #[must_use]
    pub fn active_round(&self, now: DateTime<Utc>) -> Option<&VotingRound> {
        self.segments.iter().find_map(|s| match s {
            Segment::Round { round, .. } if s.contains(now) => Some(round),
            _ => None,
        })
    }

    /// The first round that has not started yet.
    #[must_use]
    pub fn next_round(&self, now: DateTime<Utc>) -> Option<&VotingRound> {
        self.rounds().find(|r| r.start.is_some_and(|start| start > now))
    }

    /// The round an advancement view should target: the active round,
    /// else the next one, else the last one.
    #[must_use]
    pub fn current_or_next_round(&self, now: DateTime<Utc>) -> Option<&VotingRound> {
        self.active_round(now)
            .or_else(|| self.next_round(now))
            .or_else(|| self.rounds().next_back())
    }

    /// Looks up a round by its order index.
    #[must_use]
    pub fn round_by_order(&self, order_index: u32) -> Option<&VotingRound> {
        self.rounds().find(|r| r.order_index == order_index)
    }

    /// The next start, end, or finale instant strictly after `now`.
    #[must_use]
    pub fn next_boundary(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.segments
            .iter()
            .flat_map(|s| [s.start(), s.end()])
            .flatten()
            .filter(|instant| *instant > now)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RoundKind;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn period(order: u32, start: &str, end: &str) -> NominationPeriod {
        NominationPeriod {
            title: format!("Period {order}"),
            order_index: order,
            start: Some(at(start)),
            end: Some(at(end)),
            ..Default::default()
        }
    }

    fn round(order: u32, start: &str, end: &str) -> VotingRound {
        VotingRound {
            title: format!("Round {order}"),
            order_index: order,
            start: Some(at(start)),
            end: Some(at(end)),
            ..Default::default()
        }
    }

    #[test]
    fn test_sequence_orders_by_index_then_kind() {
        let config = TimelineConfig {
            nomination_periods: vec![
                period(2, "2026-01-10T00:00:00Z", "2026-01-20T00:00:00Z"),
                period(1, "2026-01-01T00:00:00Z", "2026-01-09T00:00:00Z"),
            ],
            voting_rounds: vec![
                round(5, "2026-02-10T00:00:00Z", "2026-02-20T00:00:00Z"),
                round(0, "2026-02-01T00:00:00Z", "2026-02-09T00:00:00Z"),
            ],
            finale: Some(Finale {
                title: "Gala".to_string(),
                date: at("2026-03-01T00:00:00Z"),
            }),
        };
        let timeline = Timeline::new(&Competition::default(), &config);

        let paths: Vec<String> = timeline.segments().iter().map(Segment::path).collect();
        assert_eq!(
            paths,
            vec![
                "nomination_periods[1]",
                "nomination_periods[0]",
                "voting_rounds[1]",
                "voting_rounds[0]",
                "finale"
            ]
        );
        assert_eq!(timeline.windows().len(), 4);
        assert_eq!(timeline.finale().unwrap().title, "Gala");
        assert!(!timeline.is_legacy());
    }

    #[test]
    fn test_duplicate_order_indices_keep_stored_order() {
        let config = TimelineConfig {
            voting_rounds: vec![
                VotingRound {
                    title: "A".to_string(),
                    order_index: 1,
                    ..Default::default()
                },
                VotingRound {
                    title: "B".to_string(),
                    order_index: 1,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let timeline = Timeline::new(&Competition::default(), &config);
        let titles: Vec<&str> = timeline.rounds().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_legacy_fields_synthesize_period_and_finale() {
        let competition = Competition {
            nomination_start: Some(at("2026-01-01T00:00:00Z")),
            nomination_end: Some(at("2026-01-31T00:00:00Z")),
            voting_end: Some(at("2026-02-28T00:00:00Z")),
            ..Default::default()
        };
        let timeline = Timeline::new(&competition, &TimelineConfig::default());

        assert!(timeline.is_legacy());
        assert_eq!(timeline.segments().len(), 2);
        assert_eq!(timeline.segments()[0].path(), "competition.nomination");
        assert_eq!(
            timeline.finale().map(|f| f.date),
            Some(at("2026-02-28T00:00:00Z"))
        );
    }

    #[test]
    fn test_flat_finale_used_when_collection_has_none() {
        let competition = Competition {
            finale_date: Some(at("2026-03-01T00:00:00Z")),
            voting_end: Some(at("2026-02-01T00:00:00Z")),
            ..Default::default()
        };
        let config = TimelineConfig {
            voting_rounds: vec![round(0, "2026-01-01T00:00:00Z", "2026-01-10T00:00:00Z")],
            ..Default::default()
        };
        let timeline = Timeline::new(&competition, &config);
        assert_eq!(
            timeline.finale().map(|f| f.date),
            Some(at("2026-03-01T00:00:00Z"))
        );
        assert_eq!(timeline.segments().last().unwrap().path(), "competition.finale_date");
    }

    #[test]
    fn test_contains_is_half_open_and_needs_both_bounds() {
        let seg = Segment::Round {
            source: 0,
            round: round(0, "2026-02-01T00:00:00Z", "2026-02-14T00:00:00Z"),
        };
        assert!(seg.contains(at("2026-02-01T00:00:00Z")));
        assert!(!seg.contains(at("2026-02-14T00:00:00Z")));

        let open = Segment::Round {
            source: 0,
            round: VotingRound {
                start: Some(at("2026-02-01T00:00:00Z")),
                ..Default::default()
            },
        };
        assert!(!open.contains(at("2026-02-05T00:00:00Z")));
    }

    #[test]
    fn test_round_lookup_helpers() {
        let config = TimelineConfig {
            voting_rounds: vec![
                round(0, "2026-02-01T00:00:00Z", "2026-02-10T00:00:00Z"),
                VotingRound {
                    kind: RoundKind::Judging,
                    ..round(1, "2026-02-15T00:00:00Z", "2026-02-20T00:00:00Z")
                },
            ],
            ..Default::default()
        };
        let timeline = Timeline::new(&Competition::default(), &config);

        let now = at("2026-02-05T00:00:00Z");
        assert_eq!(timeline.active_round(now).unwrap().order_index, 0);
        assert_eq!(timeline.next_round(now).unwrap().order_index, 1);

        let gap = at("2026-02-12T00:00:00Z");
        assert!(timeline.active_round(gap).is_none());
        assert_eq!(timeline.current_or_next_round(gap).unwrap().order_index, 1);

        let after = at("2026-03-01T00:00:00Z");
        assert_eq!(timeline.current_or_next_round(after).unwrap().order_index, 1);
        assert_eq!(timeline.round_by_order(1).unwrap().kind, RoundKind::Judging);
        assert!(timeline.round_by_order(7).is_none());
    }

    #[test]
    fn test_next_boundary() {
        let config = TimelineConfig {
            nomination_periods: vec![period(0, "2026-01-01T00:00:00Z", "2026-01-31T00:00:00Z")],
            finale: Some(Finale {
                title: "Finale".to_string(),
                date: at("2026-03-01T00:00:00Z"),
            }),
            ..Default::default()
        };
        let timeline = Timeline::new(&Competition::default(), &config);

        assert_eq!(
            timeline.next_boundary(at("2026-01-15T00:00:00Z")),
            Some(at("2026-01-31T00:00:00Z"))
        );
        assert_eq!(
            timeline.next_boundary(at("2026-01-31T00:00:00Z")),
            Some(at("2026-03-01T00:00:00Z"))
        );
        assert_eq!(timeline.next_boundary(at("2026-03-01T00:00:00Z")), None);
    }

    #[test]
    fn test_has_ending_and_bounded_period() {
        let open = TimelineConfig {
            nomination_periods: vec![NominationPeriod {
                start: Some(at("2026-01-01T00:00:00Z")),
                ..Default::default()
            }],
            ..Default::default()
        };
        let timeline = Timeline::new(&Competition::default(), &open);
        assert!(!timeline.has_ending());
        assert!(!timeline.has_bounded_period());
        assert_eq!(
            timeline.earliest_period_start(),
            Some(at("2026-01-01T00:00:00Z"))
        );
    }
}
