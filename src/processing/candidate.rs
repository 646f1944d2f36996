//! Candidates submitted to a screening run and their results

use crate::processing::scoring::{Ranked, ScoreBreakdown};
use serde::{Deserialize, Serialize};

/// A resume whose text has been extracted and is ready to score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub text: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub id: String,
    pub name: String,
    /// Hybrid score in `[0, 1]`.
    pub score: f32,
    pub similarity: f32,
    pub experience: u32,
    /// The resume stated no experience; `experience` is a fallback value.
    pub experience_inferred: bool,
    pub skills: Vec<String>,
    pub qualifications: Vec<String>,
    pub preview: String,
    pub breakdown: ScoreBreakdown,
}

impl Ranked for ScoreResult {
    fn rank_score(&self) -> f32 {
        self.score
    }
}

/// A resume left out of the ranking because its text could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedCandidate {
    pub id: String,
    pub name: String,
    pub reason: String,
}
