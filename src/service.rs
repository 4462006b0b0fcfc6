//! Lifecycle service.
//!
//! The call sites around the pure engine: each operation reads a snapshot
//! from the [`CompetitionStore`], asks the engine, and persists the outcome.
//! Every persisted change is logged, counted, and emitted as an [`Event`].
//!
//! There is no locking across reads and writes. Two administrators saving
//! the same timeline race and the last write wins; vote changes are the
//! exception and go through the store's atomic adjustment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::advancement::{AdvancementView, resolve_advancement};
use crate::config::schema::{Competition, CompetitionStatus, TimelineConfig};
use crate::config::validation::Validator;
use crate::error::{ServiceError, ValidationIssue};
use crate::observability::events::{Event, EventEmitter, TransitionTrigger};
use crate::observability::metrics;
use crate::phase::{PhaseReport, Timeline};
use crate::status::{TransitionCheck, TriggerResult, check_transition, evaluate_auto_transition};
use crate::store::CompetitionStore;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Lifecycle operations over a competition store.
#[derive(Debug)]
pub struct LifecycleService<S> {
    store: S,
    events: Arc<EventEmitter>,
}

impl<S: CompetitionStore> LifecycleService<S> {
    /// Creates a service that discards lifecycle events.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            events: Arc::new(EventEmitter::noop()),
        }
    }

    /// Sends lifecycle events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = events;
        self
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    async fn load(&self, competition_id: &str) -> Result<(Competition, Timeline)> {
        let competition = self.store.competition(competition_id).await?;
        let config = self.store.timeline(competition_id).await?;
        let timeline = Timeline::new(&competition, &config);
        Ok((competition, timeline))
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Resolves the display phase at `now`.
    ///
    /// # Errors
    ///
    /// Returns a store error if the competition cannot be read.
    pub async fn phase(&self, competition_id: &str, now: DateTime<Utc>) -> Result<PhaseReport> {
        let (competition, timeline) = self.load(competition_id).await?;
        let report = PhaseReport::build(&competition, &timeline, now);
        debug!(competition_id, phase = %report.phase, "phase resolved");
        Ok(report)
    }

    /// Checks a manual status change without persisting it.
    ///
    /// # Errors
    ///
    /// Returns a store error if the competition cannot be read.
    pub async fn check_status_change(
        &self,
        competition_id: &str,
        to: CompetitionStatus,
    ) -> Result<TransitionCheck> {
        let (competition, timeline) = self.load(competition_id).await?;
        Ok(check_transition(&competition, &timeline, to))
    }

    /// Reports the time-driven transition due at `now`, without applying it.
    ///
    /// # Errors
    ///
    /// Returns a store error if the competition cannot be read.
    pub async fn pending_transition(
        &self,
        competition_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TriggerResult> {
        let (competition, timeline) = self.load(competition_id).await?;
        Ok(evaluate_auto_transition(&competition, &timeline, now))
    }

    /// Computes the advancement view for a round.
    ///
    /// `round` selects a round by order index; without it the active round
    /// is used, else the next to start, else the last. A competition with
    /// no rounds yields a view with no cutoff.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::RoundNotFound`] for an unknown order index,
    /// or a store error.
    pub async fn advancement(
        &self,
        competition_id: &str,
        round: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<AdvancementView> {
        let (_, timeline) = self.load(competition_id).await?;
        let target = match round {
            Some(order_index) => Some(
                timeline
                    .round_by_order(order_index)
                    .ok_or_else(|| ServiceError::RoundNotFound(format!("order index {order_index}")))?,
            ),
            None => timeline.current_or_next_round(now),
        };

        let contestants = self.store.contestants(competition_id).await?;
        let mut view = resolve_advancement(&contestants, target.and_then(|r| r.contestants_advance));
        if let Some(target) = target {
            view = view.with_round(target.title.clone());
        }

        if let Some(tie) = &view.tie {
            metrics::record_tie_detected();
            debug!(
                competition_id,
                tied = tie.contestant_ids.len(),
                open_slots = tie.open_slots,
                cutoff_votes = tie.cutoff_votes,
                "tie at advancement cutoff"
            );
        }
        Ok(view)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Validates and saves an edited timeline.
    ///
    /// Nothing is written when validation fails. Returns the warnings of a
    /// successful save.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidTimeline`] with every validation
    /// error, or a store error.
    pub async fn save_timeline(
        &self,
        competition_id: &str,
        config: TimelineConfig,
    ) -> Result<Vec<ValidationIssue>> {
        let competition = self.store.competition(competition_id).await?;
        let result = Validator::new().validate(&competition, &config);
        if result.has_errors() {
            metrics::record_validation_failure();
            warn!(
                competition_id,
                errors = result.errors.len(),
                "timeline rejected"
            );
            return Err(ServiceError::InvalidTimeline(result.errors));
        }

        let saved = self.store.replace_timeline(competition_id, config).await?;
        info!(
            competition_id,
            periods = saved.nomination_periods.len(),
            rounds = saved.voting_rounds.len(),
            "timeline saved"
        );
        self.events.emit(Event::TimelineSaved {
            timestamp: Utc::now(),
            competition_id: competition_id.to_string(),
            periods: saved.nomination_periods.len(),
            rounds: saved.voting_rounds.len(),
            has_finale: saved.finale.is_some(),
            warnings: result.warnings.len(),
        });
        Ok(result.warnings)
    }

    /// Applies a due time-driven transition.
    ///
    /// Returns the new status, or `None` when nothing was due. Calling again
    /// with the same `now` after a transition only fires the next one if it
    /// is also due.
    ///
    /// # Errors
    ///
    /// Returns a store error; the status is unchanged in that case.
    pub async fn sync_status(
        &self,
        competition_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CompetitionStatus>> {
        let (competition, timeline) = self.load(competition_id).await?;
        let TriggerResult::Fired { to, reason } =
            evaluate_auto_transition(&competition, &timeline, now)
        else {
            return Ok(None);
        };

        self.store.set_status(competition_id, to).await?;
        self.record_status_change(
            competition_id,
            competition.status,
            to,
            TransitionTrigger::Auto,
            Some(reason),
        );
        Ok(Some(to))
    }

    /// Applies an administrator status change.
    ///
    /// Requesting the current status is accepted and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::TransitionRefused`] with the reason, or a
    /// store error.
    pub async fn change_status(
        &self,
        competition_id: &str,
        to: CompetitionStatus,
    ) -> Result<CompetitionStatus> {
        let (competition, timeline) = self.load(competition_id).await?;
        let from = competition.status;

        if let TransitionCheck::Refused(reason) = check_transition(&competition, &timeline, to) {
            info!(competition_id, %from, %to, reason = %reason, "status change refused");
            return Err(ServiceError::TransitionRefused { from, to, reason });
        }
        if from == to {
            return Ok(to);
        }

        self.store.set_status(competition_id, to).await?;
        self.record_status_change(competition_id, from, to, TransitionTrigger::Manual, None);
        Ok(to)
    }

    /// Breaks a tie at the cutoff by giving `contestant_id` one more vote.
    ///
    /// The increment is persisted and the returned view is re-read from
    /// the store.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NoTie`] when the cutoff is not contested,
    /// [`ServiceError::NotInTie`] when the contestant is not tied, or a
    /// store error.
    pub async fn break_tie(
        &self,
        competition_id: &str,
        round: Option<u32>,
        contestant_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AdvancementView> {
        let view = self.advancement(competition_id, round, now).await?;
        let tie = view.tie.ok_or(ServiceError::NoTie)?;
        if !tie.includes(contestant_id) {
            return Err(ServiceError::NotInTie(contestant_id.to_string()));
        }

        let votes = self
            .store
            .adjust_votes(competition_id, contestant_id, 1)
            .await?;
        metrics::record_vote_adjustment("tie_break");
        info!(competition_id, contestant_id, votes, "tie broken");
        self.events.emit(Event::TieBroken {
            timestamp: Utc::now(),
            competition_id: competition_id.to_string(),
            round: view.round,
            contestant_id: contestant_id.to_string(),
            tied: tie.contestant_ids,
            votes,
        });

        self.advancement(competition_id, round, now).await
    }

    /// Adds `delta` to a contestant's votes, clamping at zero.
    ///
    /// # Errors
    ///
    /// Returns a store error, including an unknown contestant.
    pub async fn adjust_votes(
        &self,
        competition_id: &str,
        contestant_id: &str,
        delta: i64,
    ) -> Result<u64> {
        let votes = self
            .store
            .adjust_votes(competition_id, contestant_id, delta)
            .await?;
        metrics::record_vote_adjustment("manual");
        info!(competition_id, contestant_id, delta, votes, "votes adjusted");
        self.events.emit(Event::VotesAdjusted {
            timestamp: Utc::now(),
            competition_id: competition_id.to_string(),
            contestant_id: contestant_id.to_string(),
            delta,
            votes,
        });
        Ok(votes)
    }

    /// Opens a round, resetting vote totals unless the round accumulates.
    ///
    /// Returns whether votes were reset.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::RoundNotFound`] for an unknown order index,
    /// or a store error.
    pub async fn open_round(&self, competition_id: &str, order_index: u32) -> Result<bool> {
        let (_, timeline) = self.load(competition_id).await?;
        let round = timeline
            .round_by_order(order_index)
            .ok_or_else(|| ServiceError::RoundNotFound(format!("order index {order_index}")))?;

        let reset = !round.votes_accumulate;
        if reset {
            let count = self.store.reset_votes(competition_id).await?;
            debug!(competition_id, count, "votes reset");
        }
        info!(competition_id, round = %round.title, reset, "round opened");
        self.events.emit(Event::RoundOpened {
            timestamp: Utc::now(),
            competition_id: competition_id.to_string(),
            round: round.title.clone(),
            order_index,
            votes_reset: reset,
        });
        Ok(reset)
    }

    fn record_status_change(
        &self,
        competition_id: &str,
        from: CompetitionStatus,
        to: CompetitionStatus,
        trigger: TransitionTrigger,
        reason: Option<String>,
    ) {
        metrics::record_status_transition(from, to, trigger);
        info!(
            competition_id,
            %from,
            %to,
            trigger = trigger.as_str(),
            reason = reason.as_deref().unwrap_or(""),
            "status changed"
        );
        self.events.emit(Event::StatusChanged {
            timestamp: Utc::now(),
            competition_id: competition_id.to_string(),
            from,
            to,
            trigger,
            reason,
        });
    }
}
