//! Timeline validation
//!
//! Checks an edited timeline before it is persisted. Validation walks the
//! same ordered segment list the phase resolver uses and collects ALL
//! problems instead of stopping at the first, so an editor can show every
//! one at once.

use std::collections::HashMap;

use crate::config::schema::{Competition, CompetitionStatus, TimelineConfig};
use crate::error::{Severity, ValidationIssue};
use crate::phase::Timeline;

// ============================================================================
// Public API
// ============================================================================

/// Result of timeline validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Validation errors (block the save).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error messages, as shown to the operator.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

/// Timeline validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `config` as the timeline of `competition`.
    pub fn validate(
        &mut self,
        competition: &Competition,
        config: &TimelineConfig,
    ) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        let timeline = Timeline::new(competition, config);

        self.validate_ending(competition, &timeline);
        self.validate_windows(&timeline);
        self.validate_sequence(&timeline);
        self.validate_finale(&timeline);
        self.validate_order_indices(config);
        self.validate_rounds(config);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// A live competition must define some ending.
    fn validate_ending(&mut self, competition: &Competition, timeline: &Timeline) {
        if competition.status == CompetitionStatus::Live && !timeline.has_ending() {
            self.add_error(
                "competition.status",
                "A live competition needs an ending: set a nomination period end, \
                 a round end, or a finale date",
            );
        }
    }

    /// Each window must end strictly after it starts.
    fn validate_windows(&mut self, timeline: &Timeline) {
        for segment in timeline.windows() {
            let path = segment.path();
            match (segment.start(), segment.end()) {
                (Some(start), Some(end)) if end <= start => {
                    self.add_error(
                        &format!("{path}.end"),
                        &format!("{} must end after it starts", capitalize(&segment.describe())),
                    );
                }
                (Some(_), None) => {
                    self.add_warning(
                        &format!("{path}.end"),
                        &format!(
                            "{} has no end date and will never be shown as open",
                            capitalize(&segment.describe())
                        ),
                    );
                }
                (None, Some(_)) => {
                    self.add_warning(
                        &format!("{path}.start"),
                        &format!(
                            "{} has no start date and will never be shown as open",
                            capitalize(&segment.describe())
                        ),
                    );
                }
                _ => {}
            }

            if segment.title().trim().is_empty() {
                self.add_warning(&format!("{path}.title"), "Title is empty");
            }
        }
    }

    /// A window may not start before its predecessor ends.
    fn validate_sequence(&mut self, timeline: &Timeline) {
        for pair in timeline.windows().windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if let (Some(previous_end), Some(start)) = (previous.end(), current.start()) {
                if start < previous_end {
                    self.add_error(
                        &format!("{}.start", current.path()),
                        &format!(
                            "{} starts before {} ends",
                            capitalize(&current.describe()),
                            previous.describe()
                        ),
                    );
                }
            }
        }
    }

    /// The finale must not precede the end of the last window.
    fn validate_finale(&mut self, timeline: &Timeline) {
        let Some(finale) = timeline.segments().last().filter(|s| s.is_finale()) else {
            return;
        };
        let Some(last) = timeline.windows().iter().rev().find(|s| s.end().is_some()) else {
            return;
        };
        if let (Some(date), Some(last_end)) = (finale.start(), last.end()) {
            if date < last_end {
                self.add_error(
                    &finale.path(),
                    &format!("Finale must be on or after the end of {}", last.describe()),
                );
            }
        }
    }

    // ========================================================================
    // Warnings
    // ========================================================================

    /// Duplicate order indices make the sequence depend on storage order.
    fn validate_order_indices(&mut self, config: &TimelineConfig) {
        let mut seen: HashMap<u32, usize> = HashMap::new();
        for (i, period) in config.nomination_periods.iter().enumerate() {
            if let Some(first) = seen.insert(period.order_index, i) {
                self.add_warning(
                    &format!("nomination_periods[{i}].order_index"),
                    &format!(
                        "Order index {} is also used by nomination_periods[{first}]",
                        period.order_index
                    ),
                );
            }
        }

        seen.clear();
        for (i, round) in config.voting_rounds.iter().enumerate() {
            if let Some(first) = seen.insert(round.order_index, i) {
                self.add_warning(
                    &format!("voting_rounds[{i}].order_index"),
                    &format!(
                        "Order index {} is also used by voting_rounds[{first}]",
                        round.order_index
                    ),
                );
            }
        }
    }

    fn validate_rounds(&mut self, config: &TimelineConfig) {
        for (i, round) in config.voting_rounds.iter().enumerate() {
            if round.contestants_advance == Some(0) {
                self.add_warning(
                    &format!("voting_rounds[{i}].contestants_advance"),
                    "A cutoff of 0 applies no cutoff; every contestant advances",
                );
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

/// Validates a timeline with a fresh [`Validator`].
#[must_use]
pub fn validate_timeline(competition: &Competition, config: &TimelineConfig) -> ValidationResult {
    Validator::new().validate(competition, config)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
