//! Fallback values for resumes with no stated experience
//!
//! All randomness in the scoring path lives behind [`ExperienceFallback`], so
//! runs can be made fully deterministic by injecting [`FixedFallback`] or a
//! seeded [`RandomFallback`].

use crate::config::{ExperienceFallbackConfig, FallbackStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

pub trait ExperienceFallback: Send + Sync {
    /// Years of experience to assume for a resume whose text states none.
    fn fallback_years(&self, text: &str) -> u32;

    fn describe(&self) -> String;
}

/// Always returns the same number of years.
#[derive(Debug, Clone, Copy)]
pub struct FixedFallback {
    years: u32,
}

impl FixedFallback {
    pub fn new(years: u32) -> Self {
        Self { years }
    }
}

impl Default for FixedFallback {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ExperienceFallback for FixedFallback {
    fn fallback_years(&self, _text: &str) -> u32 {
        self.years
    }

    fn describe(&self) -> String {
        format!("fixed ({} years)", self.years)
    }
}

/// Draws uniformly from `min_years..=max_years`.
pub struct RandomFallback {
    min_years: u32,
    max_years: u32,
    rng: Mutex<StdRng>,
}

impl RandomFallback {
    pub fn new(min_years: u32, max_years: u32) -> Self {
        Self::with_rng(min_years, max_years, StdRng::from_entropy())
    }

    pub fn seeded(min_years: u32, max_years: u32, seed: u64) -> Self {
        Self::with_rng(min_years, max_years, StdRng::seed_from_u64(seed))
    }

    fn with_rng(min_years: u32, max_years: u32, rng: StdRng) -> Self {
        let (min_years, max_years) = if min_years <= max_years {
            (min_years, max_years)
        } else {
            (max_years, min_years)
        };
        Self {
            min_years,
            max_years,
            rng: Mutex::new(rng),
        }
    }
}

impl ExperienceFallback for RandomFallback {
    fn fallback_years(&self, _text: &str) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(self.min_years..=self.max_years)
    }

    fn describe(&self) -> String {
        format!("random ({}-{} years)", self.min_years, self.max_years)
    }
}

/// Build the fallback named by the configuration.
pub fn from_config(config: &ExperienceFallbackConfig) -> Arc<dyn ExperienceFallback> {
    match config.strategy {
        FallbackStrategy::Fixed => Arc::new(FixedFallback::new(config.fixed_years)),
        FallbackStrategy::Random => match config.seed {
            Some(seed) => Arc::new(RandomFallback::seeded(config.min_years, config.max_years, seed)),
            None => Arc::new(RandomFallback::new(config.min_years, config.max_years)),
        },
    }
}
