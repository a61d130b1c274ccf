//! Elo update for a single pairwise outcome. Pure: no state, no side effects.

use crate::config::EngineConfig;
use crate::models::{Rating, VoteType};

/// Win/loss counters of both sides going into a comparison.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MatchStats {
    pub wins_a: u32,
    pub losses_a: u32,
    pub wins_b: u32,
    pub losses_b: u32,
}

/// Ratings and counters of both sides after a comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatingUpdate {
    pub new_rating_a: f64,
    pub new_rating_b: f64,
    pub wins_a: u32,
    pub losses_a: u32,
    pub wins_b: u32,
    pub losses_b: u32,
}

/// Expected score of `a` against `b` (0.5 for equal ratings).
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
}

#[derive(Clone, Debug, PartialEq)]
pub struct RatingEngine {
    k_factor: f64,
    neutral_scale: f64,
    min_rating: f64,
    max_rating: f64,
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl RatingEngine {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            k_factor: config.k_factor,
            neutral_scale: config.neutral_scale,
            min_rating: config.min_rating,
            max_rating: config.max_rating,
        }
    }

    /// New ratings for `a` (left) and `b` (right) after `outcome`.
    ///
    /// Decisive outcomes move `K * (1 - E_winner)` points from loser to winner.
    /// Neutral outcomes move at most `K * neutral_scale / 2` points towards the higher-rated
    /// side, nudging the pair apart in proportion to their gap. Counters only
    /// change on decisive outcomes. Results are clamped to `[min_rating, max_rating]`.
    pub fn calculate_new_ratings(
        &self,
        rating_a: f64,
        rating_b: f64,
        outcome: VoteType,
        stats: MatchStats,
    ) -> RatingUpdate {
        let expected_a = expected_score(rating_a, rating_b);
        let mut update = RatingUpdate {
            new_rating_a: rating_a,
            new_rating_b: rating_b,
            wins_a: stats.wins_a,
            losses_a: stats.losses_a,
            wins_b: stats.wins_b,
            losses_b: stats.losses_b,
        };

        let delta_a = match outcome {
            VoteType::Left => {
                update.wins_a += 1;
                update.losses_b += 1;
                self.k_factor * (1.0 - expected_a)
            }
            VoteType::Right => {
                update.losses_a += 1;
                update.wins_b += 1;
                -self.k_factor * expected_a
            }
            VoteType::Both | VoteType::Neither => {
                self.k_factor * self.neutral_scale * (expected_a - 0.5)
            }
        };

        update.new_rating_a = self.clamp(rating_a + delta_a);
        update.new_rating_b = self.clamp(rating_b - delta_a);
        update
    }

    /// Struct-level convenience over [`calculate_new_ratings`](Self::calculate_new_ratings).
    pub fn apply(&self, left: &Rating, right: &Rating, outcome: VoteType) -> (Rating, Rating) {
        let update = self.calculate_new_ratings(
            left.rating,
            right.rating,
            outcome,
            MatchStats {
                wins_a: left.wins,
                losses_a: left.losses,
                wins_b: right.wins,
                losses_b: right.losses,
            },
        );
        (
            Rating {
                rating: update.new_rating_a,
                wins: update.wins_a,
                losses: update.losses_a,
            },
            Rating {
                rating: update.new_rating_b,
                wins: update.wins_b,
                losses: update.losses_b,
            },
        )
    }

    fn clamp(&self, rating: f64) -> f64 {
        rating.clamp(self.min_rating, self.max_rating)
    }
}
