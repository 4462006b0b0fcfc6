//! In-memory competition store.
//!
//! Backs the CLI (one snapshot file per run) and the tests. Each
//! competition is one [`DashMap`] entry; writes hold the entry's shard
//! lock for the whole read-modify-write, so vote adjustments are atomic.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use uuid::Uuid;

use super::{CompetitionStore, Result};
use crate::config::schema::{
    Competition, CompetitionSnapshot, CompetitionStatus, Contestant, Finale, NominationPeriod,
    TimelineConfig, VotingRound,
};
use crate::error::StoreError;

/// [`CompetitionStore`] holding whole snapshots in memory.
#[derive(Debug)]
pub struct MemoryStore {
    records: DashMap<String, CompetitionSnapshot>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Creates a store holding one snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: CompetitionSnapshot) -> Self {
        let store = Self::new();
        store.insert_snapshot(snapshot);
        store
    }

    /// Inserts or replaces a competition with its timeline and contestants.
    pub fn insert_snapshot(&self, snapshot: CompetitionSnapshot) {
        self.records
            .insert(snapshot.competition.id.clone(), snapshot);
    }

    /// Exports the current state of a competition.
    #[must_use]
    pub fn snapshot(&self, competition_id: &str) -> Option<CompetitionSnapshot> {
        self.records.get(competition_id).map(|r| r.value().clone())
    }

    /// Simulates the backend going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        }
    }

    fn read<T>(&self, id: &str, f: impl FnOnce(&CompetitionSnapshot) -> T) -> Result<T> {
        self.check_available()?;
        self.records
            .get(id)
            .map(|r| f(r.value()))
            .ok_or_else(|| not_found("competition", id))
    }

    fn write<T>(&self, id: &str, f: impl FnOnce(&mut CompetitionSnapshot) -> Result<T>) -> Result<T> {
        self.check_available()?;
        let mut record = self
            .records
            .get_mut(id)
            .ok_or_else(|| not_found("competition", id))?;
        f(record.value_mut())
    }
}

fn not_found(kind: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

#[async_trait::async_trait]
impl CompetitionStore for MemoryStore {
    async fn competition(&self, id: &str) -> Result<Competition> {
        self.read(id, |r| r.competition.clone())
    }

    async fn nomination_periods(&self, competition_id: &str) -> Result<Vec<NominationPeriod>> {
        self.read(competition_id, |r| r.timeline.nomination_periods.clone())
    }

    async fn voting_rounds(&self, competition_id: &str) -> Result<Vec<VotingRound>> {
        self.read(competition_id, |r| r.timeline.voting_rounds.clone())
    }

    async fn finale(&self, competition_id: &str) -> Result<Option<Finale>> {
        self.read(competition_id, |r| r.timeline.finale.clone())
    }

    async fn contestants(&self, competition_id: &str) -> Result<Vec<Contestant>> {
        self.read(competition_id, |r| r.contestants.clone())
    }

    async fn set_status(&self, competition_id: &str, status: CompetitionStatus) -> Result<()> {
        self.write(competition_id, |r| {
            r.competition.status = status;
            Ok(())
        })
    }

    async fn replace_timeline(
        &self,
        competition_id: &str,
        mut timeline: TimelineConfig,
    ) -> Result<TimelineConfig> {
        for period in &mut timeline.nomination_periods {
            period.id = Some(Uuid::new_v4());
        }
        for round in &mut timeline.voting_rounds {
            round.id = Some(Uuid::new_v4());
        }
        self.write(competition_id, |r| {
            r.timeline = timeline.clone();
            Ok(timeline)
        })
    }

    async fn adjust_votes(
        &self,
        competition_id: &str,
        contestant_id: &str,
        delta: i64,
    ) -> Result<u64> {
        self.write(competition_id, |r| {
            let contestant = r
                .contestants
                .iter_mut()
                .find(|c| c.id == contestant_id)
                .ok_or_else(|| not_found("contestant", contestant_id))?;
            contestant.votes = contestant.votes.saturating_add_signed(delta);
            Ok(contestant.votes)
        })
    }

    async fn reset_votes(&self, competition_id: &str) -> Result<usize> {
        self.write(competition_id, |r| {
            for contestant in &mut r.contestants {
                contestant.votes = 0;
            }
            Ok(r.contestants.len())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn snapshot() -> CompetitionSnapshot {
        CompetitionSnapshot {
            competition: Competition {
                id: "spring".to_string(),
                ..Default::default()
            },
            timeline: TimelineConfig {
                voting_rounds: vec![VotingRound::default()],
                ..Default::default()
            },
            contestants: vec![Contestant {
                id: "c1".to_string(),
                name: "Ada".to_string(),
                votes: 5,
                competition_id: "spring".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_reads_and_status_write() {
        let store = MemoryStore::with_snapshot(snapshot());
        store
            .set_status("spring", CompetitionStatus::Publish)
            .await
            .unwrap();
        let competition = store.competition("spring").await.unwrap();
        assert_eq!(competition.status, CompetitionStatus::Publish);
        assert_eq!(store.timeline("spring").await.unwrap().voting_rounds.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_competition() {
        let store = MemoryStore::new();
        let err = store.competition("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "competition not found: nope");
    }

    #[tokio::test]
    async fn test_adjust_clamps_at_zero() {
        let store = MemoryStore::with_snapshot(snapshot());
        assert_eq!(store.adjust_votes("spring", "c1", -10).await.unwrap(), 0);
        assert_eq!(store.adjust_votes("spring", "c1", 3).await.unwrap(), 3);
        assert!(matches!(
            store.adjust_votes("spring", "c9", 1).await,
            Err(StoreError::NotFound {
                kind: "contestant",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_adjustments_are_not_lost() {
        let store = Arc::new(MemoryStore::with_snapshot(snapshot()));
        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.adjust_votes("spring", "c1", 2).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        let contestants = store.contestants("spring").await.unwrap();
        assert_eq!(contestants[0].votes, 105);
    }

    #[tokio::test]
    async fn test_replace_timeline_issues_new_ids() {
        let store = MemoryStore::with_snapshot(snapshot());
        let first = store
            .replace_timeline("spring", store.timeline("spring").await.unwrap())
            .await
            .unwrap();
        let second = store
            .replace_timeline("spring", first.clone())
            .await
            .unwrap();
        assert!(first.voting_rounds[0].id.is_some());
        assert_ne!(first.voting_rounds[0].id, second.voting_rounds[0].id);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryStore::with_snapshot(snapshot());
        store.set_available(false);
        assert!(matches!(
            store.competition("spring").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.reset_votes("spring").await.is_err());

        store.set_available(true);
        assert_eq!(store.reset_votes("spring").await.unwrap(), 1);
    }
}
