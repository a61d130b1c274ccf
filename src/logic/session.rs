//! Wiring between the state machine and its collaborators.
//!
//! The machine commits every vote in memory first. Only then is the store told about the new
//! history entry and ratings, and the observers given the new snapshot. A failing store is
//! logged and otherwise ignored; it never rolls a vote back.

use crate::config::EngineConfig;
use crate::logic::machine::TournamentMachine;
use crate::models::{
    candidate_set_key, Candidate, MatchRecord, RankingItem, Rating, RatingSeed, TournamentError,
    TournamentSnapshot, VoteType,
};
use std::collections::HashMap;

/// Errors a persistence collaborator may report.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// Store is offline or otherwise unreachable.
    Unavailable,
    Io(String),
    Serialize(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "Rating store is unavailable"),
            StoreError::Io(e) => write!(f, "Rating store I/O failed: {}", e),
            StoreError::Serialize(e) => write!(f, "Failed to serialize ratings: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Durable storage for ratings and match history. Ratings are keyed by candidate name.
pub trait RatingStore {
    /// Called after every accepted vote with the full rating map and the appended record.
    fn persist_vote(
        &mut self,
        ratings: &HashMap<String, Rating>,
        record: &MatchRecord,
    ) -> Result<(), StoreError>;

    /// Called after every accepted undo with the restored ratings and the removed record.
    fn persist_undo(
        &mut self,
        ratings: &HashMap<String, Rating>,
        removed: &MatchRecord,
    ) -> Result<(), StoreError> {
        let _ = (ratings, removed);
        Ok(())
    }
}

/// Receives a snapshot after every transition (for rendering).
pub trait MatchObserver {
    fn on_transition(&mut self, snapshot: &TournamentSnapshot);

    /// Called once, after the snapshot that reports completion.
    fn on_complete(&mut self, ranking: &[RankingItem]) {
        let _ = ranking;
    }
}

/// In-memory store. With `offline` set every call fails with [`StoreError::Unavailable`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub ratings: HashMap<String, Rating>,
    pub history: Vec<MatchRecord>,
    pub offline: bool,
    /// Calls rejected while offline.
    pub failures: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_online(&mut self) -> Result<(), StoreError> {
        if self.offline {
            self.failures += 1;
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

impl RatingStore for MemoryStore {
    fn persist_vote(
        &mut self,
        ratings: &HashMap<String, Rating>,
        record: &MatchRecord,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        self.ratings = ratings.clone();
        self.history.push(record.clone());
        Ok(())
    }

    fn persist_undo(
        &mut self,
        ratings: &HashMap<String, Rating>,
        removed: &MatchRecord,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        self.ratings = ratings.clone();
        self.history.retain(|r| r.id != removed.id);
        Ok(())
    }
}

/// A tournament plus the store and observers it reports to.
pub struct RankingSession<S: RatingStore> {
    machine: TournamentMachine,
    store: S,
    observers: Vec<Box<dyn MatchObserver>>,
    config: EngineConfig,
}

impl<S: RatingStore> RankingSession<S> {
    pub fn new(
        candidates: Vec<Candidate>,
        existing: &HashMap<String, RatingSeed>,
        config: EngineConfig,
        store: S,
    ) -> Self {
        Self {
            machine: TournamentMachine::new(candidates, existing, config.clone()),
            store,
            observers: Vec::new(),
            config,
        }
    }

    /// Register an observer and hand it the current snapshot straight away.
    pub fn add_observer(&mut self, mut observer: Box<dyn MatchObserver>) {
        observer.on_transition(&self.machine.snapshot());
        self.observers.push(observer);
    }

    pub fn vote(&mut self, vote: VoteType) -> Result<TournamentSnapshot, TournamentError> {
        let receipt = self.machine.vote(vote)?;
        let ratings = self.machine.ratings_by_name();
        if let Err(e) = self.store.persist_vote(&ratings, &receipt.record) {
            log::warn!(
                "Could not persist match {}: {} (kept in memory)",
                receipt.record.match_number,
                e
            );
        }
        self.notify(&receipt.snapshot, receipt.ranking.as_deref());
        Ok(receipt.snapshot)
    }

    pub fn undo(&mut self) -> Result<TournamentSnapshot, TournamentError> {
        let receipt = self.machine.undo()?;
        let ratings = self.machine.ratings_by_name();
        if let Err(e) = self.store.persist_undo(&ratings, &receipt.record) {
            log::warn!(
                "Could not persist undo of match {}: {} (kept in memory)",
                receipt.record.match_number,
                e
            );
        }
        self.notify(&receipt.snapshot, None);
        Ok(receipt.snapshot)
    }

    /// Rebuild the tournament if the candidate set differs from the current one.
    /// Returns true when a new tournament was started.
    pub fn sync_candidates(
        &mut self,
        candidates: Vec<Candidate>,
        existing: &HashMap<String, RatingSeed>,
    ) -> bool {
        if candidate_set_key(&candidates) == self.machine.candidate_set_key() {
            return false;
        }
        log::info!("Candidate set changed; starting a new tournament");
        self.machine = TournamentMachine::new(candidates, existing, self.config.clone());
        let snapshot = self.machine.snapshot();
        self.notify(&snapshot, None);
        true
    }

    /// Discard the current tournament and start over with the same candidates,
    /// keeping the ratings earned so far.
    pub fn restart(&mut self) {
        let candidates = self.machine.candidates().to_vec();
        let ratings = self.machine.ratings().clone();
        self.machine = TournamentMachine::with_ratings(candidates, &ratings, self.config.clone());
        let snapshot = self.machine.snapshot();
        self.notify(&snapshot, None);
    }

    pub fn machine(&self) -> &TournamentMachine {
        &self.machine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn notify(&mut self, snapshot: &TournamentSnapshot, ranking: Option<&[RankingItem]>) {
        for observer in &mut self.observers {
            observer.on_transition(snapshot);
            if let Some(ranking) = ranking {
                observer.on_complete(ranking);
            }
        }
    }
}
