//! Preference matrix: which pairs have been compared, and how.
//!
//! Decisive outcomes are stored under the ordered key `(preferred, other)`; neutral
//! outcomes are stored under both orderings. Lookups always check both orderings,
//! so a pair is never offered twice.

use crate::models::{candidate_set_key, Candidate, CandidateId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome stored for an ordered key `(a, b)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    /// `a` was preferred over `b`.
    Preferred,
    /// Liked both or neither.
    Neutral,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PreferenceMatrix {
    /// Every unordered pair once, ordered by (name, id) of both members.
    pairs: Vec<(CandidateId, CandidateId)>,
    /// Candidate-set key the pair list was generated for.
    pairs_key: Option<String>,
    #[serde(with = "entry_list")]
    entries: HashMap<(CandidateId, CandidateId), Preference>,
}

impl PreferenceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate all C(n,2) pairs in a stable order. A no-op if the candidate set is unchanged.
    pub fn initialize_pairs(&mut self, candidates: &[Candidate]) {
        let key = candidate_set_key(candidates);
        if self.pairs_key.as_deref() == Some(key.as_str()) {
            return;
        }

        let mut sorted: Vec<&Candidate> = candidates.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        sorted.dedup_by_key(|c| c.id);

        let n = sorted.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((sorted[i].id, sorted[j].id));
            }
        }
        log::debug!("Generated {} candidate pairs for {} candidates", pairs.len(), n);

        self.pairs = pairs;
        self.pairs_key = Some(key);
        self.entries.clear();
    }

    pub fn pairs(&self) -> &[(CandidateId, CandidateId)] {
        &self.pairs
    }

    pub fn has_been_compared(&self, a: CandidateId, b: CandidateId) -> bool {
        self.entries.contains_key(&(a, b)) || self.entries.contains_key(&(b, a))
    }

    /// Store `value` for the ordered pair. Neutral values are written under both orderings.
    pub fn record_outcome(&mut self, a: CandidateId, b: CandidateId, value: Preference) {
        self.entries.insert((a, b), value);
        if value == Preference::Neutral {
            self.entries.insert((b, a), value);
        }
    }

    /// Value stored under exactly the ordered key `(a, b)`.
    pub fn outcome(&self, a: CandidateId, b: CandidateId) -> Option<Preference> {
        self.entries.get(&(a, b)).copied()
    }

    /// Forget the pair entirely (both orderings). Used by undo.
    pub fn undo_last(&mut self, a: CandidateId, b: CandidateId) {
        self.entries.remove(&(a, b));
        self.entries.remove(&(b, a));
    }

    /// Number of unordered pairs compared so far.
    pub fn compared_count(&self) -> usize {
        self.pairs
            .iter()
            .filter(|&&(a, b)| self.has_been_compared(a, b))
            .count()
    }

    /// Number of stored ordered keys (neutral pairs count twice).
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// JSON object keys must be strings, so the tuple-keyed map is stored as a list.
mod entry_list {
    use super::{CandidateId, Preference};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    type Entries = HashMap<(CandidateId, CandidateId), Preference>;

    pub fn serialize<S: Serializer>(entries: &Entries, serializer: S) -> Result<S::Ok, S::Error> {
        let mut list: Vec<(CandidateId, CandidateId, Preference)> =
            entries.iter().map(|(&(a, b), &p)| (a, b, p)).collect();
        list.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Entries, D::Error> {
        let list = Vec::<(CandidateId, CandidateId, Preference)>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|(a, b, p)| ((a, b), p)).collect())
    }
}
