//! TournamentError, TournamentPhase, and the read-only views handed to collaborators.

use crate::models::candidate::CandidateId;
use crate::models::matchup::Match;
use serde::{Deserialize, Serialize};

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Fewer than 2 distinct candidates; the machine is inert.
    InvalidCandidateSet { count: usize },
    /// Vote requested while no match is on screen.
    NoCurrentMatch,
    /// A vote or undo is already being applied.
    TransitionInProgress,
    /// Undo requested with an empty history.
    NothingToUndo,
    /// The tournament already produced its ranking.
    TournamentComplete,
    /// Engine configuration is unusable.
    InvalidConfig(String),
}

impl TournamentError {
    /// Rejections caused by the vote/undo context (rapid double clicks, stale UI) rather than bad input.
    pub fn is_vote_context(&self) -> bool {
        matches!(
            self,
            TournamentError::NoCurrentMatch
                | TournamentError::TransitionInProgress
                | TournamentError::NothingToUndo
                | TournamentError::TournamentComplete
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidCandidateSet { count } => {
                write!(f, "Need at least 2 candidates to rank (got {})", count)
            }
            TournamentError::NoCurrentMatch => write!(f, "No match is being shown"),
            TournamentError::TransitionInProgress => write!(f, "Another vote is still being applied"),
            TournamentError::NothingToUndo => write!(f, "Nothing to undo"),
            TournamentError::TournamentComplete => write!(f, "Tournament is already complete"),
            TournamentError::InvalidConfig(reason) => write!(f, "Invalid engine configuration: {}", reason),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Lifecycle of a tournament instance. `Complete` is terminal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    /// Not yet started, or stuck here because the candidate set is invalid.
    #[default]
    Setup,
    InProgress,
    Complete,
}

/// What the UI renders after every transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub phase: TournamentPhase,
    pub current_match: Option<Match>,
    pub round_number: usize,
    /// 1-based; one past the last vote.
    pub current_match_number: usize,
    pub total_matches: usize,
    pub can_undo: bool,
    pub is_complete: bool,
    pub is_error: bool,
}

/// One line of the final ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingItem {
    pub id: CandidateId,
    pub name: String,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
}
