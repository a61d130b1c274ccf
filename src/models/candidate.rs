//! Candidate identity and the candidate-set key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a candidate (used in matches, ratings and the preference matrix).
pub type CandidateId = Uuid;

/// An item being ranked. Identity is the id; the name is for display.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Candidate {
    /// Create a candidate with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Create a candidate with a caller-supplied id (e.g. loaded from storage).
    pub fn with_id(id: CandidateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Stable key for a candidate set: sorted ids joined by `,`. Independent of input order.
pub fn candidate_set_key(candidates: &[Candidate]) -> String {
    let mut ids: Vec<String> = candidates.iter().map(|c| c.id.to_string()).collect();
    ids.sort();
    ids.dedup();
    ids.join(",")
}
