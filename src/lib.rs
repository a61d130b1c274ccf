//! Name tournament: ranks candidates through pairwise votes, Elo ratings and a
//! single-elimination bracket with adaptive match selection.

pub mod config;
pub mod logic;
pub mod models;

pub use config::EngineConfig;
pub use logic::{
    bracket, comparisons_seen, expected_score, MatchObserver, MatchSelector, MatchStats,
    MemoryStore, Preference, PreferenceMatrix, RankingSession, RatingEngine, RatingStore,
    RatingUpdate, StoreError, TournamentMachine, UndoReceipt, VoteReceipt,
};
pub use models::{
    candidate_set_key, seeds_from_json, Candidate, CandidateId, Match, MatchRecord, RankingItem,
    Rating, RatingSeed, RecordId, TournamentError, TournamentPhase, TournamentSnapshot, VoteType,
    DEFAULT_RATING,
};
