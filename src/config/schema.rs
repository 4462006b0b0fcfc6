//! Competition and timeline record types.
//!
//! These are the plain data shapes the lifecycle engine consumes. They
//! deserialize from competition snapshot files and are what the
//! persistence collaborator stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Status
// ============================================================================

/// Administrator-controlled top-level lifecycle state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    /// Being set up, not visible to the public
    #[default]
    Draft,
    /// Announced, waiting for nominations to open
    Publish,
    /// Running; the display phase is derived from the timeline
    Live,
    /// Finale has passed
    Completed,
    /// Retired from listings
    Archive,
}

impl CompetitionStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
            Self::Live => "live",
            Self::Completed => "completed",
            Self::Archive => "archive",
        }
    }
}

impl std::fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Competition
// ============================================================================

/// Root competition record.
///
/// The flat `nomination_*`, `voting_*`, and `finale_date` fields predate
/// the period/round collections and are only consulted when those
/// collections are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Competition {
    /// Competition identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Current lifecycle status
    #[serde(default)]
    pub status: CompetitionStatus,

    /// City or venue context; required before publishing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,

    /// Settings-level overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CompetitionSettings>,

    /// Legacy nomination window start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomination_start: Option<DateTime<Utc>>,

    /// Legacy nomination window end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomination_end: Option<DateTime<Utc>>,

    /// Legacy voting window start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_start: Option<DateTime<Utc>>,

    /// Legacy voting window end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_end: Option<DateTime<Utc>>,

    /// Legacy finale instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finale_date: Option<DateTime<Utc>>,
}

/// Settings sub-object whose dates override the flat competition fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompetitionSettings {
    /// Overrides `Competition::nomination_start`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomination_start: Option<DateTime<Utc>>,

    /// Overrides `Competition::nomination_end`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomination_end: Option<DateTime<Utc>>,
}

impl Competition {
    /// Nomination start, preferring the settings override over the flat field.
    #[must_use]
    pub fn nomination_start(&self) -> Option<DateTime<Utc>> {
        self.settings
            .as_ref()
            .and_then(|s| s.nomination_start)
            .or(self.nomination_start)
    }

    /// Nomination end, preferring the settings override over the flat field.
    #[must_use]
    pub fn nomination_end(&self) -> Option<DateTime<Utc>> {
        self.settings
            .as_ref()
            .and_then(|s| s.nomination_end)
            .or(self.nomination_end)
    }

    /// Whether a non-blank city/venue context is assigned.
    #[must_use]
    pub fn has_venue(&self) -> bool {
        self.venue.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

// ============================================================================
// Timeline Segments
// ============================================================================

fn default_period_title() -> String {
    "Nominations".to_string()
}

fn default_round_title() -> String {
    "Voting".to_string()
}

/// A window during which entrants may apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NominationPeriod {
    /// Row identifier, issued by the store on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Display title
    #[serde(default = "default_period_title")]
    pub title: String,

    /// Position in the nomination sequence
    #[serde(default)]
    pub order_index: u32,

    /// Window start (open when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    /// Window end (open when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,

    /// Maximum number of submissions accepted in this period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_submissions: Option<u32>,
}

impl Default for NominationPeriod {
    fn default() -> Self {
        Self {
            id: None,
            title: default_period_title(),
            order_index: 0,
            start: None,
            end: None,
            max_submissions: None,
        }
    }
}

impl NominationPeriod {
    /// Whether the period can take another entry given `submitted` so far.
    #[must_use]
    pub fn has_capacity(&self, submitted: u32) -> bool {
        self.max_submissions.is_none_or(|max| submitted < max)
    }
}

/// How a round is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundKind {
    /// Public voting
    #[default]
    Voting,
    /// Panel judging
    Judging,
}

/// A scoring window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VotingRound {
    /// Row identifier, issued by the store on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Display title
    #[serde(default = "default_round_title")]
    pub title: String,

    /// Position in the round sequence
    #[serde(default)]
    pub order_index: u32,

    /// Voting or judging
    #[serde(default)]
    pub kind: RoundKind,

    /// Window start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    /// Window end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,

    /// How many contestants proceed; unset means all advance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contestants_advance: Option<u32>,

    /// Whether totals carry over from the prior round instead of resetting
    #[serde(default)]
    pub votes_accumulate: bool,
}

impl Default for VotingRound {
    fn default() -> Self {
        Self {
            id: None,
            title: default_round_title(),
            order_index: 0,
            kind: RoundKind::Voting,
            start: None,
            end: None,
            contestants_advance: None,
            votes_accumulate: false,
        }
    }
}

/// The single instant marking competition end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Finale {
    /// Display title
    #[serde(default = "default_finale_title")]
    pub title: String,

    /// Finale instant
    pub date: DateTime<Utc>,
}

fn default_finale_title() -> String {
    "Finale".to_string()
}

/// The editable timeline collections of one competition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimelineConfig {
    /// Nomination periods, in any order
    #[serde(default)]
    pub nomination_periods: Vec<NominationPeriod>,

    /// Voting and judging rounds, in any order
    #[serde(default)]
    pub voting_rounds: Vec<VotingRound>,

    /// Finale, if scheduled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finale: Option<Finale>,
}

impl TimelineConfig {
    /// True when neither periods nor rounds are configured, meaning the
    /// legacy flat competition fields are authoritative.
    #[must_use]
    pub fn uses_legacy_fields(&self) -> bool {
        self.nomination_periods.is_empty() && self.voting_rounds.is_empty()
    }
}

// ============================================================================
// Contestants
// ============================================================================

/// A contestant and its live vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Contestant {
    /// Contestant identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Current vote total
    #[serde(default)]
    pub votes: u64,

    /// Owning competition (filled in from the snapshot when omitted)
    #[serde(default)]
    pub competition_id: String,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything the engine reads about one competition, as stored in a
/// snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompetitionSnapshot {
    /// The competition record
    pub competition: Competition,

    /// Periods, rounds, and finale
    #[serde(flatten)]
    pub timeline: TimelineConfig,

    /// Contestants with vote counts
    #[serde(default)]
    pub contestants: Vec<Contestant>,
}
