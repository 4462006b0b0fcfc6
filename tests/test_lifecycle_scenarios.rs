//! End-to-end lifecycle scenarios over the pure engine.

mod common;

use chrono::{Duration, Utc};
use common::at;
use podium::advancement::resolve_advancement;
use podium::config::schema::{
    Competition, CompetitionSettings, CompetitionStatus, Contestant, Finale, NominationPeriod,
    RoundKind, TimelineConfig, VotingRound,
};
use podium::config::validate_timeline;
use podium::phase::{Phase, Timeline, TimelinePhase, resolve_phase_from_config};
use podium::status::{
    TransitionCheck, check_transition, evaluate_auto_transition, should_auto_transition_to_completed,
    should_auto_transition_to_live,
};

fn competition(status: CompetitionStatus) -> Competition {
    Competition {
        id: "spring".to_string(),
        name: "Spring Showcase".to_string(),
        status,
        venue: Some("Austin".to_string()),
        ..Default::default()
    }
}

fn season() -> TimelineConfig {
    TimelineConfig {
        nomination_periods: vec![NominationPeriod {
            title: "Open call".to_string(),
            start: Some(at("2026-01-01T00:00:00Z")),
            end: Some(at("2026-01-31T00:00:00Z")),
            ..Default::default()
        }],
        voting_rounds: vec![
            VotingRound {
                title: "Judges".to_string(),
                order_index: 1,
                kind: RoundKind::Judging,
                start: Some(at("2026-02-16T00:00:00Z")),
                end: Some(at("2026-02-20T00:00:00Z")),
                ..Default::default()
            },
            VotingRound {
                title: "Semifinal".to_string(),
                order_index: 0,
                start: Some(at("2026-02-01T00:00:00Z")),
                end: Some(at("2026-02-14T00:00:00Z")),
                contestants_advance: Some(2),
                ..Default::default()
            },
        ],
        finale: Some(Finale {
            title: "Grand Finale".to_string(),
            date: at("2026-03-01T00:00:00Z"),
        }),
    }
}

fn contestants(votes: &[u64]) -> Vec<Contestant> {
    votes
        .iter()
        .enumerate()
        .map(|(i, v)| Contestant {
            id: format!("c{}", i + 1),
            name: String::new(),
            votes: *v,
            competition_id: "spring".to_string(),
        })
        .collect()
}

#[test]
fn season_walkthrough() {
    let live = competition(CompetitionStatus::Live);
    let config = season();
    let cases = [
        ("2025-12-20T00:00:00Z", Phase::Live(TimelinePhase::Upcoming)),
        ("2026-01-15T00:00:00Z", Phase::Live(TimelinePhase::Nomination)),
        ("2026-01-31T00:00:00Z", Phase::Live(TimelinePhase::BetweenRounds)),
        ("2026-02-07T00:00:00Z", Phase::Live(TimelinePhase::Voting)),
        ("2026-02-15T00:00:00Z", Phase::Live(TimelinePhase::BetweenRounds)),
        ("2026-02-17T00:00:00Z", Phase::Live(TimelinePhase::Judging)),
        ("2026-02-25T00:00:00Z", Phase::Live(TimelinePhase::BetweenRounds)),
        ("2026-03-01T00:00:00Z", Phase::Live(TimelinePhase::Completed)),
    ];
    for (instant, expected) in cases {
        assert_eq!(
            resolve_phase_from_config(&live, &config, at(instant)),
            expected,
            "at {instant}"
        );
    }
    assert!(validate_timeline(&live, &config).is_valid());
}

#[test]
fn passed_finale_beats_malformed_round() {
    let live = competition(CompetitionStatus::Live);
    let mut config = season();
    config.voting_rounds[1].end = Some(at("2026-04-01T00:00:00Z"));
    config.voting_rounds.remove(0);

    let phase = resolve_phase_from_config(&live, &config, at("2026-03-05T00:00:00Z"));
    assert_eq!(phase, Phase::Live(TimelinePhase::Completed));
    assert!(!validate_timeline(&live, &config).is_valid());
}

#[test]
fn legacy_competition_without_collections() {
    let mut live = competition(CompetitionStatus::Live);
    live.nomination_start = Some(at("2026-01-01T00:00:00Z"));
    live.nomination_end = Some(at("2026-01-31T00:00:00Z"));
    live.finale_date = Some(at("2026-03-01T00:00:00Z"));
    let config = TimelineConfig::default();

    assert_eq!(
        resolve_phase_from_config(&live, &config, at("2026-01-10T00:00:00Z")),
        Phase::Live(TimelinePhase::Nomination)
    );
    assert_eq!(
        resolve_phase_from_config(&live, &config, at("2026-03-10T00:00:00Z")),
        Phase::Live(TimelinePhase::Completed)
    );
}

#[test]
fn publish_goes_live_yesterday_not_tomorrow() {
    let config = TimelineConfig::default();
    let now = Utc::now();

    let mut published = competition(CompetitionStatus::Publish);
    published.settings = Some(CompetitionSettings {
        nomination_start: Some(now - Duration::days(1)),
        nomination_end: None,
    });
    let timeline = Timeline::new(&published, &config);
    assert!(should_auto_transition_to_live(&published, &timeline, now));

    published.settings = Some(CompetitionSettings {
        nomination_start: Some(now + Duration::days(1)),
        nomination_end: None,
    });
    let timeline = Timeline::new(&published, &config);
    assert!(!should_auto_transition_to_live(&published, &timeline, now));
}

#[test]
fn auto_transitions_fire_once_each() {
    let mut competition = competition(CompetitionStatus::Publish);
    let config = season();
    let now = at("2026-03-02T00:00:00Z");

    let timeline = Timeline::new(&competition, &config);
    let first = evaluate_auto_transition(&competition, &timeline, now);
    assert_eq!(first, evaluate_auto_transition(&competition, &timeline, now));
    assert_eq!(first.target(), Some(CompetitionStatus::Live));

    competition.status = CompetitionStatus::Live;
    assert!(!should_auto_transition_to_live(&competition, &timeline, now));
    assert!(should_auto_transition_to_completed(&competition, &timeline, now));

    competition.status = CompetitionStatus::Completed;
    assert_eq!(evaluate_auto_transition(&competition, &timeline, now).target(), None);
}

#[test]
fn completed_season_only_archives() {
    let completed = competition(CompetitionStatus::Completed);
    let timeline = Timeline::new(&completed, &season());

    for to in [
        CompetitionStatus::Draft,
        CompetitionStatus::Publish,
        CompetitionStatus::Live,
    ] {
        assert!(!check_transition(&completed, &timeline, to).is_allowed(), "{to}");
    }
    assert_eq!(
        check_transition(&completed, &timeline, CompetitionStatus::Archive),
        TransitionCheck::Allowed
    );
}

#[test]
fn advancement_examples() {
    let tied = resolve_advancement(&contestants(&[100, 90, 90, 80]), Some(2));
    let tie = tied.tie.expect("tie at the cutoff");
    assert_eq!(tie.contestant_ids, vec!["c2", "c3"]);
    assert_eq!(tie.cutoff_votes, 90);

    let clean = resolve_advancement(&contestants(&[100, 90, 80, 80]), Some(2));
    assert!(clean.is_settled());
    assert_eq!(clean.advancing, vec!["c1", "c2"]);
    assert_eq!(clean.eliminated, vec!["c3", "c4"]);
}

#[test]
fn zero_cutoff_advances_everyone() {
    let view = resolve_advancement(&contestants(&[3, 3, 3]), Some(0));
    assert!(view.is_settled());
    assert_eq!(view.advancing.len(), 3);
}
