//! Match (the pair on screen), VoteType, and the immutable MatchRecord history entry.

use crate::models::candidate::{Candidate, CandidateId};
use crate::models::rating::Rating;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a recorded vote.
pub type RecordId = Uuid;

/// How the user answered a comparison.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Left,
    Right,
    /// Liked both: neutral.
    Both,
    /// Liked neither: neutral.
    Neither,
}

impl VoteType {
    /// Neutral votes consume the pair but count as neither a win nor a loss.
    pub fn is_neutral(self) -> bool {
        matches!(self, VoteType::Both | VoteType::Neither)
    }
}

/// The comparison currently being shown.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub left: Candidate,
    pub right: Candidate,
}

impl Match {
    pub fn new(left: Candidate, right: Candidate) -> Self {
        Self { left, right }
    }

    /// True if this match pairs `a` and `b`, in either order.
    pub fn involves_pair(&self, a: CandidateId, b: CandidateId) -> bool {
        (self.left.id == a && self.right.id == b) || (self.left.id == b && self.right.id == a)
    }

    /// (winner, loser) ids for a decisive vote; None for neutral votes.
    pub fn decide(&self, vote: VoteType) -> Option<(CandidateId, CandidateId)> {
        match vote {
            VoteType::Left => Some((self.left.id, self.right.id)),
            VoteType::Right => Some((self.right.id, self.left.id)),
            VoteType::Both | VoteType::Neither => None,
        }
    }
}

/// One vote, appended to history and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: RecordId,
    pub matchup: Match,
    /// None for neutral votes.
    pub winner: Option<CandidateId>,
    /// None for neutral votes.
    pub loser: Option<CandidateId>,
    pub vote: VoteType,
    /// 1-based number of the match this vote answered.
    pub match_number: usize,
    pub round_number: usize,
    pub timestamp: DateTime<Utc>,
    pub left_before: Rating,
    pub right_before: Rating,
    pub left_after: Rating,
    pub right_after: Rating,
}
