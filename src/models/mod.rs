//! Data structures for the name tournament: candidates, ratings, matches, snapshots.

mod candidate;
mod matchup;
mod rating;
mod tournament;

pub use candidate::{candidate_set_key, Candidate, CandidateId};
pub use matchup::{Match, MatchRecord, RecordId, VoteType};
pub use rating::{seeds_from_json, Rating, RatingSeed, DEFAULT_RATING};
pub use tournament::{RankingItem, TournamentError, TournamentPhase, TournamentSnapshot};
