//! Tournament state machine: `Setup -> InProgress -> Complete`.
//!
//! Owns the candidates, ratings, preference matrix, selector and vote history, and is
//! only mutated through [`TournamentMachine::vote`] and [`TournamentMachine::undo`].
//! Rejected commands leave every field untouched and are logged, not panicked on.

use crate::config::EngineConfig;
use crate::logic::bracket;
use crate::logic::preference::{Preference, PreferenceMatrix};
use crate::logic::rating::RatingEngine;
use crate::logic::selector::MatchSelector;
use crate::models::{
    candidate_set_key, Candidate, CandidateId, Match, MatchRecord, RankingItem, Rating, RatingSeed,
    TournamentError, TournamentPhase, TournamentSnapshot, VoteType,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Result of an accepted vote.
#[derive(Clone, Debug, PartialEq)]
pub struct VoteReceipt {
    /// The history entry the vote appended.
    pub record: MatchRecord,
    pub snapshot: TournamentSnapshot,
    /// Final ranking, present only when this vote completed the tournament.
    pub ranking: Option<Vec<RankingItem>>,
}

/// Result of an accepted undo.
#[derive(Clone, Debug, PartialEq)]
pub struct UndoReceipt {
    /// The history entry that was removed.
    pub record: MatchRecord,
    pub snapshot: TournamentSnapshot,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentMachine {
    candidates: Vec<Candidate>,
    config: EngineConfig,
    matrix: PreferenceMatrix,
    selector: MatchSelector,
    ratings: HashMap<CandidateId, Rating>,
    history: Vec<MatchRecord>,
    /// Selector cursor at the time each history entry's match was shown.
    cursor_trail: Vec<usize>,
    current_match: Option<Match>,
    current_match_number: usize,
    total_matches: usize,
    phase: TournamentPhase,
    is_error: bool,
    #[serde(skip)]
    transitioning: bool,
}

impl TournamentMachine {
    /// Build a tournament, seeding ratings by candidate name (the persistence format).
    ///
    /// Fewer than 2 distinct candidates leaves the machine in `Setup` with the error flag set;
    /// every command is then rejected. An invalid config falls back to the defaults.
    pub fn new(
        candidates: Vec<Candidate>,
        existing: &HashMap<String, RatingSeed>,
        config: EngineConfig,
    ) -> Self {
        let config = usable_config(config);
        let fallback = config.default_rating;
        Self::build(candidates, config, |c| {
            existing.get(&c.name).map(|seed| seed.resolve(fallback))
        })
    }

    /// Build a tournament seeding ratings by candidate id.
    pub fn with_ratings(
        candidates: Vec<Candidate>,
        ratings: &HashMap<CandidateId, Rating>,
        config: EngineConfig,
    ) -> Self {
        let config = usable_config(config);
        let fallback = config.default_rating;
        Self::build(candidates, config, |c| {
            ratings
                .get(&c.id)
                .map(|rating| RatingSeed::Full(*rating).resolve(fallback))
        })
    }

    /// Like [`new`](Self::new), but surfaces an invalid candidate set or config as an error.
    pub fn start(
        candidates: Vec<Candidate>,
        existing: &HashMap<String, RatingSeed>,
        config: EngineConfig,
    ) -> Result<Self, TournamentError> {
        config.validate()?;
        let machine = Self::new(candidates, existing, config);
        if machine.is_error {
            return Err(TournamentError::InvalidCandidateSet {
                count: machine.candidates.len(),
            });
        }
        Ok(machine)
    }

    fn build(
        candidates: Vec<Candidate>,
        config: EngineConfig,
        seed: impl Fn(&Candidate) -> Option<Rating>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if seen.insert(candidate.id) {
                unique.push(candidate);
            } else {
                log::warn!("Dropping duplicate candidate id {} ({})", candidate.id, candidate.name);
            }
        }

        let ratings: HashMap<CandidateId, Rating> = unique
            .iter()
            .map(|c| {
                let mut rating =
                    seed(c).unwrap_or_else(|| Rating::with_rating(config.default_rating));
                let clamped = rating.rating.clamp(config.min_rating, config.max_rating);
                if clamped != rating.rating {
                    log::warn!(
                        "Stored rating {} for {} is outside [{}, {}]; using {}",
                        rating.rating,
                        c.name,
                        config.min_rating,
                        config.max_rating,
                        clamped
                    );
                    rating.rating = clamped;
                }
                (c.id, rating)
            })
            .collect();

        let mut machine = Self {
            matrix: PreferenceMatrix::new(),
            selector: MatchSelector::new(config.selection_weight, config.default_rating),
            total_matches: bracket::total_matches(unique.len()),
            candidates: unique,
            config,
            ratings,
            history: Vec::new(),
            cursor_trail: Vec::new(),
            current_match: None,
            current_match_number: 1,
            phase: TournamentPhase::Setup,
            is_error: false,
            transitioning: false,
        };

        if machine.candidates.len() < 2 {
            log::warn!(
                "Cannot start tournament with {} candidate(s)",
                machine.candidates.len()
            );
            machine.is_error = true;
            return machine;
        }

        machine.matrix.initialize_pairs(&machine.candidates);
        let values = machine.rating_values();
        let first = machine
            .selector
            .select_next(&machine.candidates, &machine.matrix, &values, &machine.history)
            .unwrap_or_else(|| {
                Match::new(machine.candidates[0].clone(), machine.candidates[1].clone())
            });
        machine.current_match = Some(first);
        machine.phase = TournamentPhase::InProgress;
        log::info!(
            "Started tournament: {} candidates, {} matches over {} round(s)",
            machine.candidates.len(),
            machine.total_matches,
            bracket::total_rounds(machine.candidates.len())
        );
        machine
    }

    /// Apply the user's answer to the current match.
    pub fn vote(&mut self, vote: VoteType) -> Result<VoteReceipt, TournamentError> {
        self.ensure_accepting()?;
        let current = match self.current_match.clone() {
            Some(m) => m,
            None => return Err(reject(TournamentError::NoCurrentMatch)),
        };
        self.transitioning = true;

        let engine = RatingEngine::from_config(&self.config);
        let left_before = self.rating_of(current.left.id);
        let right_before = self.rating_of(current.right.id);
        let (left_after, right_after) = engine.apply(&left_before, &right_before, vote);
        self.ratings.insert(current.left.id, left_after);
        self.ratings.insert(current.right.id, right_after);

        let decided = current.decide(vote);
        match decided {
            Some((winner, loser)) => self.matrix.record_outcome(winner, loser, Preference::Preferred),
            None => self
                .matrix
                .record_outcome(current.left.id, current.right.id, Preference::Neutral),
        }

        let record = MatchRecord {
            id: Uuid::new_v4(),
            winner: decided.map(|(w, _)| w),
            loser: decided.map(|(_, l)| l),
            vote,
            match_number: self.current_match_number,
            round_number: self.round_number(),
            timestamp: Utc::now(),
            left_before,
            right_before,
            left_after,
            right_after,
            matchup: current,
        };
        log::debug!(
            "Match {} ({} vs {}): {:?}",
            record.match_number,
            record.matchup.left.name,
            record.matchup.right.name,
            vote
        );
        self.history.push(record.clone());
        self.cursor_trail.push(self.selector.cursor());
        self.current_match_number += 1;

        self.advance();
        self.transitioning = false;

        let ranking = self.is_complete().then(|| self.ranking());
        Ok(VoteReceipt {
            record,
            snapshot: self.snapshot(),
            ranking,
        })
    }

    /// Take back the most recent vote: ratings, matrix entries, selector cursor,
    /// current match and match number all return to their pre-vote values.
    pub fn undo(&mut self) -> Result<UndoReceipt, TournamentError> {
        self.ensure_accepting()?;
        let record = match self.history.pop() {
            Some(r) => r,
            None => return Err(reject(TournamentError::NothingToUndo)),
        };
        self.transitioning = true;

        let cursor = self.cursor_trail.pop().unwrap_or(0);
        let (left, right) = (record.matchup.left.id, record.matchup.right.id);
        self.ratings.insert(left, record.left_before);
        self.ratings.insert(right, record.right_before);
        self.matrix.undo_last(left, right);
        self.selector.rewind(cursor);
        let previous = self.round_number();
        self.current_match = Some(record.matchup.clone());
        self.current_match_number = record.match_number;
        log::debug!("Undid match {}", record.match_number);
        self.log_round_change(previous);

        self.transitioning = false;
        Ok(UndoReceipt {
            record,
            snapshot: self.snapshot(),
        })
    }

    /// Hold the machine while the UI animates to the next match; votes are rejected until
    /// [`end_transition`](Self::end_transition).
    pub fn begin_transition(&mut self) {
        self.transitioning = true;
    }

    pub fn end_transition(&mut self) {
        self.transitioning = false;
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    fn ensure_accepting(&self) -> Result<(), TournamentError> {
        if self.is_error {
            return Err(reject(TournamentError::InvalidCandidateSet {
                count: self.candidates.len(),
            }));
        }
        if self.transitioning {
            return Err(reject(TournamentError::TransitionInProgress));
        }
        if self.phase == TournamentPhase::Complete {
            return Err(reject(TournamentError::TournamentComplete));
        }
        Ok(())
    }

    /// Move to the next match, or complete when the bracket or the pair list runs out.
    fn advance(&mut self) {
        if self.current_match_number > self.total_matches {
            self.complete();
            return;
        }
        let values = self.rating_values();
        let next =
            self.selector
                .select_next(&self.candidates, &self.matrix, &values, &self.history);
        match next {
            Some(next) => {
                let previous = self.history.last().map_or(1, |r| r.round_number);
                self.log_round_change(previous);
                self.current_match = Some(next);
            }
            None => {
                log::info!(
                    "No uncompared pair left after {} of {} matches; finishing early",
                    self.history.len(),
                    self.total_matches
                );
                self.complete();
            }
        }
    }

    fn log_round_change(&self, previous: usize) {
        let round = self.round_number();
        if round != previous {
            log::debug!("Round {} -> {}", previous, round);
        }
    }

    fn complete(&mut self) {
        self.current_match = None;
        self.phase = TournamentPhase::Complete;
        if let Some(top) = self.ranking().first() {
            log::info!("Tournament complete: {} leads at {:.1}", top.name, top.rating);
        }
    }

    pub fn snapshot(&self) -> TournamentSnapshot {
        TournamentSnapshot {
            phase: self.phase,
            current_match: self.current_match.clone(),
            round_number: self.round_number(),
            current_match_number: self.current_match_number,
            total_matches: self.total_matches,
            can_undo: self.can_undo(),
            is_complete: self.is_complete(),
            is_error: self.is_error,
        }
    }

    /// All candidates by rating, highest first; ties by name, then id.
    pub fn ranking(&self) -> Vec<RankingItem> {
        let mut items: Vec<RankingItem> = self
            .candidates
            .iter()
            .map(|c| {
                let r = self.rating_of(c.id);
                RankingItem {
                    id: c.id,
                    name: c.name.clone(),
                    rating: r.rating,
                    wins: r.wins,
                    losses: r.losses,
                }
            })
            .collect();
        items.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }

    /// Always derived from the match number, never stored.
    pub fn round_number(&self) -> usize {
        bracket::round_for(self.candidates.len(), self.current_match_number)
    }

    pub fn can_undo(&self) -> bool {
        !self.is_error
            && !self.transitioning
            && self.phase == TournamentPhase::InProgress
            && !self.history.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TournamentPhase::Complete
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn phase(&self) -> TournamentPhase {
        self.phase
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.current_match.as_ref()
    }

    pub fn current_match_number(&self) -> usize {
        self.current_match_number
    }

    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }

    pub fn matrix(&self) -> &PreferenceMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ratings(&self) -> &HashMap<CandidateId, Rating> {
        &self.ratings
    }

    /// Rating of a candidate, or a fresh default rating if none is known.
    pub fn rating_of(&self, id: CandidateId) -> Rating {
        self.ratings
            .get(&id)
            .copied()
            .unwrap_or_else(|| Rating::with_rating(self.config.default_rating))
    }

    /// Ratings keyed by candidate name, the shape the persistence layer stores.
    /// Duplicate names collapse; the later candidate wins.
    pub fn ratings_by_name(&self) -> HashMap<String, Rating> {
        self.candidates
            .iter()
            .map(|c| (c.name.clone(), self.rating_of(c.id)))
            .collect()
    }

    /// Completed matches as a fraction of the total, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.is_error {
            return 0.0;
        }
        if self.is_complete() || self.total_matches == 0 {
            return 1.0;
        }
        (self.history.len() as f64 / self.total_matches as f64).min(1.0)
    }

    pub fn candidate_set_key(&self) -> String {
        candidate_set_key(&self.candidates)
    }

    fn rating_values(&self) -> HashMap<CandidateId, f64> {
        self.ratings.iter().map(|(id, r)| (*id, r.rating)).collect()
    }
}

fn reject(err: TournamentError) -> TournamentError {
    log::warn!("Ignoring command: {}", err);
    err
}

fn usable_config(config: EngineConfig) -> EngineConfig {
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("{}; using defaults", e);
            EngineConfig::default()
        }
    }
}
