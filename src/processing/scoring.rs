//! Hybrid score aggregation and candidate ranking

use crate::config::ScoringConfig;
use serde::{Deserialize, Serialize};

/// Per-factor contributions to a hybrid score. Each component is already
/// multiplied by its weight, so the components sum to the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub similarity: f32,
    pub experience: f32,
    pub skills: f32,
    pub qualifications: f32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f32 {
        self.similarity + self.experience + self.skills + self.qualifications
    }
}

fn capped_ratio(value: f32, target: f32) -> f32 {
    if target <= 0.0 {
        return 1.0;
    }
    (value / target).clamp(0.0, 1.0)
}

/// Break a hybrid score into its weighted factors.
///
/// Every factor ratio is capped at 1.0 before weighting, so no factor can
/// contribute more than its weight share.
pub fn score_breakdown(
    similarity: f32,
    experience_years: u32,
    skill_count: usize,
    qualification_count: usize,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let similarity = if similarity.is_finite() {
        similarity.clamp(0.0, 1.0)
    } else {
        0.0
    };

    ScoreBreakdown {
        similarity: similarity * config.similarity_weight,
        experience: capped_ratio(experience_years as f32, config.experience_cap_years as f32)
            * config.experience_weight,
        skills: capped_ratio(skill_count as f32, config.skills_target as f32) * config.skills_weight,
        qualifications: capped_ratio(
            qualification_count as f32,
            config.qualifications_target as f32,
        ) * config.qualifications_weight,
    }
}

/// `similarity*0.5 + min(exp,10)/10*0.2 + min(skills/3,1)*0.2 + min(quals/2,1)*0.1`
/// with the default weights.
pub fn hybrid_score(
    similarity: f32,
    experience_years: u32,
    skill_count: usize,
    qualification_count: usize,
    config: &ScoringConfig,
) -> f32 {
    score_breakdown(
        similarity,
        experience_years,
        skill_count,
        qualification_count,
        config,
    )
    .total()
    .clamp(0.0, 1.0)
}

/// Anything that can be placed in a ranking.
pub trait Ranked {
    fn rank_score(&self) -> f32;
}

/// Sort descending by score. The sort is stable, so equal scores keep their
/// submission order.
pub fn rank<T: Ranked>(items: &mut [T]) {
    items.sort_by(|a, b| b.rank_score().total_cmp(&a.rank_score()));
}
