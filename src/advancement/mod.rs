//! Round advancement and ties at the cutoff.
//!
//! Given a round's cutoff N and the live vote counts, decides who
//! advances, who is out, and whether the Nth slot is contested. Pure:
//! tie-breaks are applied by the caller through the store and the view is
//! re-derived from the updated counts.

use serde::Serialize;

use crate::config::schema::Contestant;

/// A contestant at its sort position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedContestant {
    /// 1-based position after sorting by votes
    pub position: usize,
    /// Contestant identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Vote total
    pub votes: u64,
}

/// Contestants sharing the vote count at the cutoff boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TieAtCutoff {
    /// Tied contestant ids, in ranked order
    pub contestant_ids: Vec<String>,
    /// Advancement slots the tied contestants contend for
    pub open_slots: usize,
    /// The shared vote count
    pub cutoff_votes: u64,
}

impl TieAtCutoff {
    /// Whether `contestant_id` is part of the tie.
    #[must_use]
    pub fn includes(&self, contestant_id: &str) -> bool {
        self.contestant_ids.iter().any(|id| id == contestant_id)
    }
}

/// Who advances from a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancementView {
    /// Title of the round the view was computed for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    /// Number of advancing contestants, when a cutoff applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<usize>,
    /// Everyone, highest votes first
    pub ranked: Vec<RankedContestant>,
    /// Ids certain to advance
    pub advancing: Vec<String>,
    /// Ids certain to be out
    pub eliminated: Vec<String>,
    /// Vote count at position N
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff_votes: Option<u64>,
    /// Contested boundary, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie: Option<TieAtCutoff>,
}

impl AdvancementView {
    /// Attaches the round title.
    #[must_use]
    pub fn with_round(mut self, title: impl Into<String>) -> Self {
        self.round = Some(title.into());
        self
    }

    /// True when no tie needs an administrator.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.tie.is_none()
    }
}

/// Sorts contestants by votes, highest first.
///
/// Equal counts keep their input order; that order is for display only
/// and never decides advancement.
#[must_use]
pub fn rank(contestants: &[Contestant]) -> Vec<RankedContestant> {
    let mut sorted: Vec<&Contestant> = contestants.iter().collect();
    sorted.sort_by(|a, b| b.votes.cmp(&a.votes));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, c)| RankedContestant {
            position: i + 1,
            id: c.id.clone(),
            name: c.name.clone(),
            votes: c.votes,
        })
        .collect()
}

/// Resolves advancement for a cutoff of `cutoff` contestants.
///
/// A cutoff of zero or none means everyone advances. When the contestant
/// just below the cutoff has the same votes as the one at it, every
/// contestant with that count is reported in [`TieAtCutoff`] and only
/// those strictly above it are listed as advancing.
#[must_use]
pub fn resolve_advancement(contestants: &[Contestant], cutoff: Option<u32>) -> AdvancementView {
    let ranked = rank(contestants);
    let cutoff = cutoff
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok());

    let Some(n) = cutoff.filter(|n| ranked.len() > *n) else {
        return AdvancementView {
            round: None,
            cutoff,
            advancing: ranked.iter().map(|c| c.id.clone()).collect(),
            eliminated: Vec::new(),
            ranked,
            cutoff_votes: None,
            tie: None,
        };
    };

    let cutoff_votes = ranked[n - 1].votes;
    let contested = ranked[n].votes == cutoff_votes;

    let (advancing, eliminated, tie) = if contested {
        let above = ranked.iter().filter(|c| c.votes > cutoff_votes);
        let advancing: Vec<String> = above.map(|c| c.id.clone()).collect();
        let tie = TieAtCutoff {
            contestant_ids: ranked
                .iter()
                .filter(|c| c.votes == cutoff_votes)
                .map(|c| c.id.clone())
                .collect(),
            open_slots: n - advancing.len(),
            cutoff_votes,
        };
        let eliminated = ranked
            .iter()
            .filter(|c| c.votes < cutoff_votes)
            .map(|c| c.id.clone())
            .collect();
        (advancing, eliminated, Some(tie))
    } else {
        (
            ranked[..n].iter().map(|c| c.id.clone()).collect(),
            ranked[n..].iter().map(|c| c.id.clone()).collect(),
            None,
        )
    };

    AdvancementView {
        round: None,
        cutoff,
        ranked,
        advancing,
        eliminated,
        cutoff_votes: Some(cutoff_votes),
        tie,
    }
}
