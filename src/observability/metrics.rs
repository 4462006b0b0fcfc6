//! Lifecycle metrics.
//!
//! Recorded through the `metrics` facade. The library installs no
//! recorder; an embedding process that wants the numbers installs its
//! own exporter, and without one every call is a no-op.

use metrics::{counter, describe_counter};

use crate::config::schema::CompetitionStatus;
use crate::observability::events::TransitionTrigger;

/// Registers metric descriptions with the global recorder.
pub fn describe_metrics() {
    describe_counter!(
        "podium_status_transitions_total",
        "Persisted status changes by source and target status"
    );
    describe_counter!(
        "podium_validation_failures_total",
        "Timeline saves rejected by validation"
    );
    describe_counter!(
        "podium_ties_detected_total",
        "Advancement views computed with a tie at the cutoff"
    );
    describe_counter!(
        "podium_vote_adjustments_total",
        "Manual vote changes, including tie-breaks"
    );
}

/// Records a persisted status change.
pub fn record_status_transition(
    from: CompetitionStatus,
    to: CompetitionStatus,
    trigger: TransitionTrigger,
) {
    counter!(
        "podium_status_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str(),
        "trigger" => trigger.as_str(),
    )
    .increment(1);
}

/// Records a rejected timeline save.
pub fn record_validation_failure() {
    counter!("podium_validation_failures_total").increment(1);
}

/// Records a tie found at a cutoff.
pub fn record_tie_detected() {
    counter!("podium_ties_detected_total").increment(1);
}

/// Records a vote adjustment; `reason` is `"manual"` or `"tie_break"`.
pub fn record_vote_adjustment(reason: &'static str) {
    counter!("podium_vote_adjustments_total", "reason" => reason).increment(1);
}
