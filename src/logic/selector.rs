//! Next-match selection.
//!
//! Two candidates: the only pair, once. More: every uncompared pair is scored
//! `|r(a) - r(b)| - weight * (u(a) + u(b))` with `u(x) = 1 / (1 + seen(x))`, where
//! `seen(x)` counts the decisive votes `x` took part in. The lowest score wins, so
//! closely rated pairs come first and, among those, less-compared candidates.

use crate::logic::preference::PreferenceMatrix;
use crate::models::{Candidate, CandidateId, Match, MatchRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSelector {
    /// Index into the matrix's pair list where the next scan starts.
    cursor: usize,
    weight: f64,
    default_rating: f64,
}

impl MatchSelector {
    pub fn new(weight: f64, default_rating: f64) -> Self {
        Self {
            cursor: 0,
            weight,
            default_rating,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Put the cursor back to a value previously read with [`cursor`](Self::cursor).
    pub fn rewind(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// Pick the next pair to show, or None once every pair has been compared.
    ///
    /// The scan starts at the cursor and wraps around, so equal scores resolve to the
    /// pair closest after the previous pick. The cursor moves to the chosen pair's index.
    pub fn select_next(
        &mut self,
        candidates: &[Candidate],
        matrix: &PreferenceMatrix,
        ratings: &HashMap<CandidateId, f64>,
        history: &[MatchRecord],
    ) -> Option<Match> {
        if candidates.len() == 2 {
            let (a, b) = (&candidates[0], &candidates[1]);
            if matrix.has_been_compared(a.id, b.id) {
                return None;
            }
            return Some(Match::new(a.clone(), b.clone()));
        }

        let pairs = matrix.pairs();
        if pairs.is_empty() {
            return None;
        }

        let seen = comparisons_seen(history);
        let rating = |id: &CandidateId| ratings.get(id).copied().unwrap_or(self.default_rating);
        let uncertainty = |id: &CandidateId| 1.0 / (1.0 + seen.get(id).copied().unwrap_or(0) as f64);

        let start = self.cursor % pairs.len();
        let mut best: Option<(usize, f64)> = None;
        for offset in 0..pairs.len() {
            let index = (start + offset) % pairs.len();
            let (a, b) = pairs[index];
            if matrix.has_been_compared(a, b) {
                continue;
            }
            let score =
                (rating(&a) - rating(&b)).abs() - self.weight * (uncertainty(&a) + uncertainty(&b));
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((index, score));
            }
        }

        let (index, score) = best?;
        let (a, b) = pairs[index];
        let left = candidates.iter().find(|c| c.id == a)?;
        let right = candidates.iter().find(|c| c.id == b)?;
        log::debug!(
            "Selected pair #{} ({} vs {}) with score {:.2}",
            index,
            left.name,
            right.name,
            score
        );
        self.cursor = index;
        Some(Match::new(left.clone(), right.clone()))
    }
}

/// How many decisive votes each candidate appeared in, as winner or loser.
pub fn comparisons_seen(history: &[MatchRecord]) -> HashMap<CandidateId, u32> {
    let mut seen = HashMap::new();
    for record in history.iter().filter(|r| !r.vote.is_neutral()) {
        for id in [record.matchup.left.id, record.matchup.right.id] {
            *seen.entry(id).or_insert(0) += 1;
        }
    }
    seen
}
