//! Tournament logic: Elo updates, pair bookkeeping, match selection, bracket rounds,
//! the state machine, and collaborator wiring.

pub mod bracket;
mod machine;
mod preference;
mod rating;
mod selector;
mod session;

pub use machine::{TournamentMachine, UndoReceipt, VoteReceipt};
pub use preference::{Preference, PreferenceMatrix};
pub use rating::{expected_score, MatchStats, RatingEngine, RatingUpdate};
pub use selector::{comparisons_seen, MatchSelector};
pub use session::{MatchObserver, MemoryStore, RankingSession, RatingStore, StoreError};
