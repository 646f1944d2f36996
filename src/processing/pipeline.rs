//! Screening pipeline: extraction, scoring and ranking of a batch of resumes

use crate::config::{Config, ScoringConfig};
use crate::error::{Result, ResumeRankerError};
use crate::input::InputManager;
use crate::output::report::RunReport;
use crate::processing::candidate::{Candidate, ScoreResult, SkippedCandidate};
use crate::processing::events::{EventSink, PipelineEvent};
use crate::processing::extractors::{ExperienceExtractor, RoleMatcher};
use crate::processing::fallback::{self, ExperienceFallback};
use crate::processing::roles::{RoleCatalog, RoleProfile};
use crate::processing::scoring::{rank, score_breakdown};
use crate::processing::similarity::{self, SimilarityEstimator};
use crate::processing::text_processor::preview;
use chrono::Utc;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

const DEFAULT_PREVIEW_CHARS: usize = 200;
const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_CONCURRENT_EXTRACTIONS: usize = 4;

/// Scores resumes against a job description for one role.
///
/// Holds only immutable state; every resume is scored independently of the
/// others, and a run is ranked only after all resumes are done.
pub struct ScreeningPipeline {
    catalog: RoleCatalog,
    scoring: ScoringConfig,
    estimator: Arc<dyn SimilarityEstimator>,
    fallback: Arc<dyn ExperienceFallback>,
    experience: ExperienceExtractor,
    preview_chars: usize,
    extraction_timeout: Duration,
    max_concurrent_extractions: usize,
    input: InputManager,
}

impl ScreeningPipeline {
    pub fn new(
        catalog: RoleCatalog,
        scoring: ScoringConfig,
        estimator: Arc<dyn SimilarityEstimator>,
        fallback: Arc<dyn ExperienceFallback>,
    ) -> Result<Self> {
        let experience = ExperienceExtractor::new(fallback.clone())?;
        Ok(Self {
            catalog,
            scoring,
            estimator,
            fallback,
            experience,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            extraction_timeout: DEFAULT_EXTRACTION_TIMEOUT,
            max_concurrent_extractions: DEFAULT_MAX_CONCURRENT_EXTRACTIONS,
            input: InputManager::new(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let processing = &config.processing;
        Ok(Self::new(
            config.roles.clone(),
            config.scoring.clone(),
            similarity::from_method(processing.similarity),
            fallback::from_config(&processing.experience_fallback),
        )?
        .with_preview_chars(processing.preview_chars)
        .with_extraction_timeout(config.extraction_timeout())
        .with_max_concurrent_extractions(processing.max_concurrent_extractions))
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn with_extraction_timeout(mut self, timeout: Duration) -> Self {
        self.extraction_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_extractions(mut self, limit: usize) -> Self {
        self.max_concurrent_extractions = limit.max(1);
        self
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Score every candidate and return them ranked by hybrid score,
    /// highest first. Zero candidates yield an empty ranking.
    pub fn run(&self, job_text: &str, candidates: &[Candidate], role: &str) -> Result<Vec<ScoreResult>> {
        self.run_with_events(job_text, candidates, role, &EventSink::none())
    }

    fn run_with_events(
        &self,
        job_text: &str,
        candidates: &[Candidate],
        role: &str,
        events: &EventSink,
    ) -> Result<Vec<ScoreResult>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let profile = self.catalog.lookup(role);
        let matcher = RoleMatcher::new(&profile)?;

        let mut results: Vec<ScoreResult> = candidates
            .iter()
            .map(|candidate| {
                let similarity = self.estimator.similarity(job_text, &candidate.text);
                let result = self.score_candidate(candidate, similarity, &matcher);
                debug!(
                    "{} ({}): score {:.3}, similarity {:.3}, {} years, {} skills, {} degrees",
                    result.name,
                    result.id,
                    result.score,
                    result.similarity,
                    result.experience,
                    result.skills.len(),
                    result.qualifications.len()
                );
                events.emit(PipelineEvent::Scored {
                    id: result.id.clone(),
                    name: result.name.clone(),
                    score: result.score,
                });
                result
            })
            .collect();

        rank(&mut results);
        Ok(results)
    }

    fn score_candidate(&self, candidate: &Candidate, similarity: f32, matcher: &RoleMatcher) -> ScoreResult {
        let experience = self.experience.extract(&candidate.text);
        let skills = matcher.skills(&candidate.text);
        let qualifications = matcher.qualifications(&candidate.text);

        let breakdown = score_breakdown(
            similarity,
            experience.years,
            skills.count(),
            qualifications.count(),
            &self.scoring,
        );

        ScoreResult {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            score: breakdown.total().clamp(0.0, 1.0),
            similarity: similarity.clamp(0.0, 1.0),
            experience: experience.years,
            experience_inferred: experience.inferred,
            skills: skills.matched,
            qualifications: qualifications.matched,
            preview: preview(&candidate.text, self.preview_chars),
            breakdown,
        }
    }

    /// Score already-extracted candidates and wrap the ranking in a report.
    pub fn screen_candidates(
        &self,
        job_source: &str,
        job_text: &str,
        candidates: &[Candidate],
        role: &str,
    ) -> Result<RunReport> {
        let started = Instant::now();
        let results = self.run(job_text, candidates, role)?;
        Ok(self.build_report(role, job_source, results, Vec::new(), started))
    }

    /// Extract the job description and every resume, then score and rank.
    ///
    /// Resumes are extracted concurrently, each under the extraction timeout.
    /// A resume that cannot be extracted is reported as skipped and the run
    /// continues; only a job description failure aborts the run.
    ///
    /// Extracted text lives for one run only: the input cache is emptied
    /// before returning, whether the run succeeded or not.
    pub async fn screen(
        &self,
        job_path: &Path,
        resume_paths: &[PathBuf],
        role: &str,
        events: EventSink,
    ) -> Result<RunReport> {
        let outcome = self.screen_files(job_path, resume_paths, role, &events).await;
        self.input.clear_cache();
        outcome
    }

    async fn screen_files(
        &self,
        job_path: &Path,
        resume_paths: &[PathBuf],
        role: &str,
        events: &EventSink,
    ) -> Result<RunReport> {
        let started = Instant::now();

        let job_text = self
            .input
            .extract_with_timeout(job_path, self.extraction_timeout)
            .await?;

        events.emit(PipelineEvent::Started {
            role: role.to_string(),
            total: resume_paths.len(),
        });
        info!("Processing {} resumes for job role: {}", resume_paths.len(), role);

        let (candidates, skipped) = self.extract_resumes(resume_paths, events).await;
        let results = self.run_with_events(&job_text, &candidates, role, events)?;

        events.emit(PipelineEvent::Completed {
            ranked: results.len(),
            skipped: skipped.len(),
        });

        Ok(self.build_report(
            role,
            &job_path.display().to_string(),
            results,
            skipped,
            started,
        ))
    }

    async fn extract_resumes(
        &self,
        resume_paths: &[PathBuf],
        events: &EventSink,
    ) -> (Vec<Candidate>, Vec<SkippedCandidate>) {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_extractions));
        let mut tasks = JoinSet::new();

        for (index, path) in resume_paths.iter().enumerate() {
            let path = path.clone();
            let input = self.input.clone();
            let semaphore = semaphore.clone();
            let limit = self.extraction_timeout;

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => input.extract_with_timeout(&path, limit).await,
                    Err(e) => Err(ResumeRankerError::Processing(format!(
                        "Extraction queue closed: {}",
                        e
                    ))),
                };
                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<Result<String>>> = resume_paths.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => warn!("Resume extraction task failed: {}", e),
            }
        }

        let mut candidates = Vec::new();
        let mut skipped = Vec::new();
        for (index, (path, outcome)) in resume_paths.iter().zip(outcomes).enumerate() {
            let id = (index + 1).to_string();
            let name = display_name(path);

            match outcome {
                Some(Ok(text)) => {
                    events.emit(PipelineEvent::Extracted {
                        id: id.clone(),
                        name: name.clone(),
                    });
                    candidates.push(Candidate { id, name, text });
                }
                failed => {
                    let reason = match failed {
                        Some(Err(e)) => e.to_string(),
                        _ => "extraction task did not complete".to_string(),
                    };
                    warn!("Skipping resume {} ({}): {}", name, id, reason);
                    events.emit(PipelineEvent::Skipped {
                        id: id.clone(),
                        name: name.clone(),
                        reason: reason.clone(),
                    });
                    skipped.push(SkippedCandidate { id, name, reason });
                }
            }
        }

        (candidates, skipped)
    }

    fn build_report(
        &self,
        role: &str,
        job_source: &str,
        results: Vec<ScoreResult>,
        skipped: Vec<SkippedCandidate>,
        started: Instant,
    ) -> RunReport {
        let generated_at = Utc::now();
        RunReport {
            run_id: RunReport::run_id_for(generated_at),
            role: role.to_string(),
            role_known: self.catalog.contains(role),
            job_source: job_source.to_string(),
            similarity_method: self.estimator.name().to_string(),
            experience_fallback: self.fallback.describe(),
            generated_at,
            processing_time_ms: started.elapsed().as_millis() as u64,
            results,
            skipped,
        }
    }

    /// Requirements the pipeline will score `role` against.
    pub fn role_profile(&self, role: &str) -> RoleProfile {
        self.catalog.lookup(role)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::fallback::FixedFallback;
    use crate::processing::similarity::{JaccardSimilarity, TfIdfSimilarity};
    use tempfile::TempDir;

    const JOB: &str = "5 years experience in python and sql. bachelor degree.";

    fn pipeline() -> ScreeningPipeline {
        ScreeningPipeline::new(
            RoleCatalog::builtin(),
            ScoringConfig::default(),
            Arc::new(JaccardSimilarity),
            Arc::new(FixedFallback::new(1)),
        )
        .unwrap()
    }

    #[test]
    fn test_run_ranks_descending() {
        let candidates = vec![
            Candidate::new("1", "weak.txt", "Enjoys hiking and painting."),
            Candidate::new(
                "2",
                "strong.txt",
                "Software engineer, 6 years of experience in python, java and sql. Master degree.",
            ),
        ];
        let results = pipeline().run(JOB, &candidates, "Software Engineer").unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "2");
        assert!(results[0].score >= results[1].score);
        assert_eq!(results[0].skills, vec!["python", "java"]);
        assert_eq!(results[0].qualifications, vec!["master"]);
        assert_eq!(results[0].experience, 6);
        assert!(!results[0].experience_inferred);
        assert!(results[1].experience_inferred);
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let candidates: Vec<Candidate> = (1..=4)
            .map(|i| Candidate::new(i.to_string(), format!("cv{}.txt", i), "identical text"))
            .collect();
        let results = pipeline().run(JOB, &candidates, "Software Engineer").unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_zero_candidates() {
        let results = pipeline().run(JOB, &[], "Software Engineer").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_unknown_role_scores_without_requirements() {
        let candidates = vec![Candidate::new("1", "cv.txt", "python java c++ bachelor master")];
        let results = pipeline().run(JOB, &candidates, "Astronaut").unwrap();
        assert!(results[0].skills.is_empty());
        assert!(results[0].qualifications.is_empty());
    }

    #[test]
    fn test_blank_texts_do_not_fail() {
        let candidates = vec![Candidate::new("1", "blank.txt", "   ")];
        let results = pipeline().run("", &candidates, "Software Engineer").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].similarity, 0.0);
        assert!(results[0].skills.is_empty());
        assert_eq!(results[0].preview, "   ");
    }

    #[test]
    fn test_preview_length() {
        let text = format!("python {}", "x".repeat(500));
        let candidates = vec![Candidate::new("1", "long.txt", text.clone())];
        let results = pipeline()
            .with_preview_chars(50)
            .run(JOB, &candidates, "Software Engineer")
            .unwrap();
        assert_eq!(results[0].preview, text[..50]);
    }

    #[test]
    fn test_screen_candidates_report() {
        let candidates = vec![Candidate::new("1", "cv.txt", "python developer")];
        let report = pipeline()
            .screen_candidates("inline", JOB, &candidates, "Software Engineer")
            .unwrap();
        assert_eq!(report.results.len(), 1);
        assert!(report.skipped.is_empty());
        assert!(report.role_known);
        assert_eq!(report.similarity_method, "jaccard");
        assert_eq!(report.experience_fallback, "fixed (1 years)");
    }

    #[test]
    fn test_from_default_config() {
        let pipeline = ScreeningPipeline::from_config(&Config::default()).unwrap();
        assert_eq!(pipeline.role_profile("Cloud Engineer").skills, vec!["aws", "azure", "gcp"]);
    }

    #[test]
    fn test_similarity_independent_of_other_resumes() {
        let pipeline = ScreeningPipeline::new(
            RoleCatalog::builtin(),
            ScoringConfig::default(),
            Arc::new(TfIdfSimilarity),
            Arc::new(FixedFallback::new(1)),
        )
        .unwrap();
        let job = "rust tokio serde developer";
        let target = Candidate::new("1", "a.txt", "rust rust rust cooking");

        let alone = pipeline.run(job, &[target.clone()], "Software Engineer").unwrap();
        let batch = vec![
            target.clone(),
            Candidate::new("2", "b.txt", "rust developer"),
            Candidate::new("3", "c.txt", "tokio serde cooking rust"),
            Candidate::new("4", "d.txt", "baking bread"),
        ];
        let together = pipeline.run(job, &batch, "Software Engineer").unwrap();
        let in_batch = together.iter().find(|r| r.id == "1").unwrap();

        assert_eq!(alone[0].similarity.to_bits(), in_batch.similarity.to_bits());
        assert_eq!(alone[0].score.to_bits(), in_batch.score.to_bits());
    }

    #[tokio::test]
    async fn test_screen_reads_fresh_text_each_run() {
        let temp = TempDir::new().unwrap();
        let job = temp.path().join("job.txt");
        let resume = temp.path().join("resume.txt");
        std::fs::write(&job, JOB).unwrap();
        std::fs::write(&resume, "chef who cooks").unwrap();

        let pipeline = pipeline();
        let first = pipeline
            .screen(&job, &[resume.clone()], "Software Engineer", EventSink::none())
            .await
            .unwrap();
        assert!(first.results[0].skills.is_empty());
        assert_eq!(pipeline.input.cache_size(), 0);

        std::fs::write(&resume, "python java c++ bachelor, 4 years of experience").unwrap();
        let second = pipeline
            .screen(&job, &[resume.clone()], "Software Engineer", EventSink::none())
            .await
            .unwrap();
        assert_eq!(second.results[0].skills, vec!["python", "java", "c++"]);
        assert_eq!(second.results[0].experience, 4);
        assert_eq!(second.results[0].preview, "python java c++ bachelor, 4 years of experience");
        assert_eq!(pipeline.input.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_failed_screen_clears_cache() {
        let temp = TempDir::new().unwrap();
        let resume = temp.path().join("resume.txt");
        std::fs::write(&resume, "python developer").unwrap();

        let pipeline = pipeline();
        pipeline.input.extract_text(&resume).await.unwrap();
        assert_eq!(pipeline.input.cache_size(), 1);

        let result = pipeline
            .screen(&temp.path().join("missing.txt"), &[resume], "Software Engineer", EventSink::none())
            .await;
        assert!(result.is_err());
        assert_eq!(pipeline.input.cache_size(), 0);
    }
}
