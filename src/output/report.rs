//! Report of one screening run

use crate::processing::candidate::{ScoreResult, SkippedCandidate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything produced by one screening run, ready for presentation or
/// storage. `results` is ranked best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Sortable UTC timestamp identifying the run.
    pub run_id: String,

    pub role: String,

    /// False when the role was not in the catalog and no skills or degrees
    /// were matched.
    pub role_known: bool,

    /// Where the job description came from (a path, or a label for inline text).
    pub job_source: String,

    pub similarity_method: String,

    pub experience_fallback: String,

    pub generated_at: DateTime<Utc>,

    pub processing_time_ms: u64,

    pub results: Vec<ScoreResult>,

    pub skipped: Vec<SkippedCandidate>,
}

impl RunReport {
    pub fn run_id_for(at: DateTime<Utc>) -> String {
        at.format("%Y%m%dT%H%M%S%3fZ").to_string()
    }

    pub fn best(&self) -> Option<&ScoreResult> {
        self.results.first()
    }

    pub fn average_score(&self) -> Option<f32> {
        if self.results.is_empty() {
            return None;
        }
        Some(self.results.iter().map(|r| r.score).sum::<f32>() / self.results.len() as f32)
    }

    pub fn submitted(&self) -> usize {
        self.results.len() + self.skipped.len()
    }
}
