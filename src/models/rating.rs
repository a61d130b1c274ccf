//! Rating data per candidate, plus the shapes existing ratings arrive in.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Rating every candidate starts from when nothing is known about it.
pub const DEFAULT_RATING: f64 = 1500.0;

/// Elo-style rating with decisive win/loss counters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

fn default_rating() -> f64 {
    DEFAULT_RATING
}

impl Default for Rating {
    fn default() -> Self {
        Self::with_rating(DEFAULT_RATING)
    }
}

impl Rating {
    pub fn with_rating(rating: f64) -> Self {
        Self {
            rating,
            wins: 0,
            losses: 0,
        }
    }
}

/// Existing rating as handed over by persistence: either a bare number or a full record.
///
/// A bare number means `{ rating: n, wins: 0, losses: 0 }`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingSeed {
    Score(f64),
    Full(Rating),
}

impl RatingSeed {
    /// Resolve the seed into a rating. Non-finite values fall back to `fallback`.
    pub fn resolve(&self, fallback: f64) -> Rating {
        let rating = match *self {
            RatingSeed::Score(score) => Rating::with_rating(score),
            RatingSeed::Full(rating) => rating,
        };
        if rating.rating.is_finite() {
            rating
        } else {
            log::warn!("Discarding non-finite stored rating, using {}", fallback);
            Rating {
                rating: fallback,
                wins: 0,
                losses: 0,
            }
        }
    }
}

impl From<f64> for RatingSeed {
    fn from(score: f64) -> Self {
        RatingSeed::Score(score)
    }
}

impl From<Rating> for RatingSeed {
    fn from(rating: Rating) -> Self {
        RatingSeed::Full(rating)
    }
}

/// Parse stored ratings keyed by name.
///
/// Accepts a bare `{name: seed}` map or a store file shaped `{ratings, history}`.
/// Entries that are not a number or a rating record are logged and skipped.
pub fn seeds_from_json(text: &str) -> Result<HashMap<String, RatingSeed>, serde_json::Error> {
    let mut entries = match serde_json::from_str(text)? {
        Value::Object(map) => map,
        _ => return Err(serde::de::Error::custom("expected an object of ratings")),
    };
    if entries.contains_key("history") && entries.get("ratings").map_or(false, Value::is_object) {
        if let Some(Value::Object(inner)) = entries.remove("ratings") {
            entries = inner;
        }
    }

    let mut seeds = HashMap::new();
    for (name, raw) in entries {
        match serde_json::from_value::<RatingSeed>(raw) {
            Ok(seed) => {
                seeds.insert(name, seed);
            }
            Err(e) => log::warn!("Skipping stored rating for {}: {}", name, e),
        }
    }
    Ok(seeds)
}
