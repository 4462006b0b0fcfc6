//! Persistence collaborator.
//!
//! The engine reads competitions, timelines, and contestants through
//! [`CompetitionStore`] and writes status, timeline, and vote changes back
//! through it. Failures are returned as [`StoreError`] and never retried
//! here.

pub mod memory;

pub use memory::MemoryStore;

use crate::config::schema::{
    Competition, CompetitionStatus, Contestant, Finale, NominationPeriod, TimelineConfig,
    VotingRound,
};
use crate::error::StoreError;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Async access to stored competition data.
///
/// Implementations must apply [`adjust_votes`](Self::adjust_votes) as a
/// single atomic `votes = max(0, votes + delta)` update so concurrent
/// adjustments never lose increments.
#[async_trait::async_trait]
pub trait CompetitionStore: Send + Sync {
    /// Reads a competition record.
    async fn competition(&self, id: &str) -> Result<Competition>;

    /// Reads a competition's nomination periods, in stored order.
    async fn nomination_periods(&self, competition_id: &str) -> Result<Vec<NominationPeriod>>;

    /// Reads a competition's voting rounds, in stored order.
    async fn voting_rounds(&self, competition_id: &str) -> Result<Vec<VotingRound>>;

    /// Reads a competition's finale.
    async fn finale(&self, competition_id: &str) -> Result<Option<Finale>>;

    /// Reads a competition's contestants with their vote counts.
    async fn contestants(&self, competition_id: &str) -> Result<Vec<Contestant>>;

    /// Writes a new status.
    async fn set_status(&self, competition_id: &str, status: CompetitionStatus) -> Result<()>;

    /// Replaces the periods, rounds, and finale.
    ///
    /// Existing rows are deleted and the new ones inserted with fresh ids.
    /// Returns the timeline as stored.
    async fn replace_timeline(
        &self,
        competition_id: &str,
        timeline: TimelineConfig,
    ) -> Result<TimelineConfig>;

    /// Adds `delta` to a contestant's votes, clamping at zero.
    ///
    /// Returns the new total.
    async fn adjust_votes(&self, competition_id: &str, contestant_id: &str, delta: i64)
    -> Result<u64>;

    /// Sets every contestant's votes to zero. Returns how many were reset.
    async fn reset_votes(&self, competition_id: &str) -> Result<usize>;

    /// Reads the full timeline collections.
    async fn timeline(&self, competition_id: &str) -> Result<TimelineConfig> {
        Ok(TimelineConfig {
            nomination_periods: self.nomination_periods(competition_id).await?,
            voting_rounds: self.voting_rounds(competition_id).await?,
            finale: self.finale(competition_id).await?,
        })
    }
}
