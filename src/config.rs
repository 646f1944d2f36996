//! Configuration management for the resume ranker

use crate::error::{Result, ResumeRankerError};
use crate::processing::roles::RoleCatalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub roles: RoleCatalog,
}

/// Weights and saturation points of the hybrid score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub similarity_weight: f32,
    pub experience_weight: f32,
    pub skills_weight: f32,
    pub qualifications_weight: f32,
    /// Years of experience at which the experience factor saturates.
    pub experience_cap_years: u32,
    /// Matched skills at which the skills factor saturates.
    pub skills_target: u32,
    /// Matched degrees at which the qualifications factor saturates.
    pub qualifications_target: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub preview_chars: usize,
    pub extraction_timeout_secs: u64,
    pub max_concurrent_extractions: usize,
    pub similarity: SimilarityMethod,
    pub experience_fallback: ExperienceFallbackConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimilarityMethod {
    #[serde(rename = "tfidf")]
    TfIdf,
    #[serde(rename = "jaccard")]
    Jaccard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceFallbackConfig {
    pub strategy: FallbackStrategy,
    pub fixed_years: u32,
    pub min_years: u32,
    pub max_years: u32,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    Fixed,
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub store_results: bool,
    pub results_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_weight: 0.5,
            experience_weight: 0.2,
            skills_weight: 0.2,
            qualifications_weight: 0.1,
            experience_cap_years: 10,
            skills_target: 3,
            qualifications_target: 2,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            preview_chars: 200,
            extraction_timeout_secs: 30,
            max_concurrent_extractions: 4,
            similarity: SimilarityMethod::TfIdf,
            experience_fallback: ExperienceFallbackConfig::default(),
        }
    }
}

impl Default for ExperienceFallbackConfig {
    fn default() -> Self {
        Self {
            strategy: FallbackStrategy::Fixed,
            fixed_years: 1,
            min_years: 1,
            max_years: 5,
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        let results_dir = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("runs");

        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
            store_results: true,
            results_dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            processing: ProcessingConfig::default(),
            output: OutputConfig::default(),
            roles: RoleCatalog::builtin(),
        }
    }
}

impl Config {
    /// Load the user config file, writing the defaults on first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            ResumeRankerError::Configuration(format!(
                "Failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.roles = config.roles.normalized();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        let weights = [
            ("similarity_weight", scoring.similarity_weight),
            ("experience_weight", scoring.experience_weight),
            ("skills_weight", scoring.skills_weight),
            ("qualifications_weight", scoring.qualifications_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ResumeRankerError::Configuration(format!(
                    "scoring.{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        if total > 1.0 + 1e-4 {
            return Err(ResumeRankerError::Configuration(format!(
                "scoring weights must sum to at most 1.0, got {:.3}",
                total
            )));
        }

        if scoring.experience_cap_years == 0
            || scoring.skills_target == 0
            || scoring.qualifications_target == 0
        {
            return Err(ResumeRankerError::Configuration(
                "scoring caps and targets must be greater than zero".to_string(),
            ));
        }

        let processing = &self.processing;
        if processing.preview_chars == 0 {
            return Err(ResumeRankerError::Configuration(
                "processing.preview_chars must be greater than zero".to_string(),
            ));
        }
        if processing.extraction_timeout_secs == 0 || processing.max_concurrent_extractions == 0 {
            return Err(ResumeRankerError::Configuration(
                "processing timeout and concurrency must be greater than zero".to_string(),
            ));
        }

        let fallback = &processing.experience_fallback;
        if fallback.min_years > fallback.max_years {
            return Err(ResumeRankerError::Configuration(format!(
                "experience_fallback.min_years ({}) exceeds max_years ({})",
                fallback.min_years, fallback.max_years
            )));
        }

        Ok(())
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.processing.extraction_timeout_secs)
    }

    pub fn results_dir(&self) -> &Path {
        &self.output.results_dir
    }
}
