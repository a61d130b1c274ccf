//! Engine tuning: Elo constants, rating bounds and the match-selection weight.
//! Every field has a default; `from_env` overrides individual fields from `RANKER_*` variables.

use crate::models::{TournamentError, DEFAULT_RATING};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Elo K-factor applied to decisive votes.
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
    /// Fraction of a draw's adjustment applied to neutral ("both"/"neither") votes.
    #[serde(default = "default_neutral_scale")]
    pub neutral_scale: f64,
    #[serde(default = "default_rating")]
    pub default_rating: f64,
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
    #[serde(default = "default_max_rating")]
    pub max_rating: f64,
    /// How strongly under-compared candidates are preferred when picking the next pair.
    #[serde(default = "default_selection_weight")]
    pub selection_weight: f64,
}

fn default_k_factor() -> f64 {
    32.0
}

fn default_neutral_scale() -> f64 {
    0.1
}

fn default_rating() -> f64 {
    DEFAULT_RATING
}

fn default_min_rating() -> f64 {
    800.0
}

fn default_max_rating() -> f64 {
    2400.0
}

fn default_selection_weight() -> f64 {
    50.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k_factor: default_k_factor(),
            neutral_scale: default_neutral_scale(),
            default_rating: default_rating(),
            min_rating: default_min_rating(),
            max_rating: default_max_rating(),
            selection_weight: default_selection_weight(),
        }
    }
}

impl EngineConfig {
    /// Defaults, overridden by any parsable `RANKER_*` environment variable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            k_factor: env_f64("RANKER_K_FACTOR").unwrap_or(defaults.k_factor),
            neutral_scale: env_f64("RANKER_NEUTRAL_SCALE").unwrap_or(defaults.neutral_scale),
            default_rating: env_f64("RANKER_DEFAULT_RATING").unwrap_or(defaults.default_rating),
            min_rating: env_f64("RANKER_MIN_RATING").unwrap_or(defaults.min_rating),
            max_rating: env_f64("RANKER_MAX_RATING").unwrap_or(defaults.max_rating),
            selection_weight: env_f64("RANKER_SELECTION_WEIGHT")
                .unwrap_or(defaults.selection_weight),
        }
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        let all = [
            self.k_factor,
            self.neutral_scale,
            self.default_rating,
            self.min_rating,
            self.max_rating,
            self.selection_weight,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(TournamentError::InvalidConfig("values must be finite".into()));
        }
        if self.k_factor <= 0.0 {
            return Err(TournamentError::InvalidConfig("k_factor must be positive".into()));
        }
        if self.neutral_scale < 0.0 {
            return Err(TournamentError::InvalidConfig(
                "neutral_scale must not be negative".into(),
            ));
        }
        if self.min_rating >= self.max_rating {
            return Err(TournamentError::InvalidConfig(format!(
                "min_rating {} must be below max_rating {}",
                self.min_rating, self.max_rating
            )));
        }
        if self.default_rating < self.min_rating || self.default_rating > self.max_rating {
            return Err(TournamentError::InvalidConfig(format!(
                "default_rating {} outside [{}, {}]",
                self.default_rating, self.min_rating, self.max_rating
            )));
        }
        Ok(())
    }
}

fn env_f64(key: &str) -> Option<f64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}
