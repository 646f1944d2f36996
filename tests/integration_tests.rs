//! Integration tests for the resume ranker

use resume_ranker::config::{Config, ScoringConfig, SimilarityMethod};
use resume_ranker::input::InputManager;
use resume_ranker::output::csv_export::{parse_csv, to_csv};
use resume_ranker::processing::candidate::Candidate;
use resume_ranker::processing::events::{EventSink, PipelineEvent};
use resume_ranker::processing::fallback::FixedFallback;
use resume_ranker::processing::pipeline::ScreeningPipeline;
use resume_ranker::processing::roles::RoleCatalog;
use resume_ranker::processing::similarity::{JaccardSimilarity, TfIdfSimilarity};
use resume_ranker::store::ResultStore;
use resume_ranker::ResumeRankerError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::unbounded_channel;

const JOB_TEXT: &str = "5 years experience in python and sql. bachelor degree.";
const SE_RESUME: &str = "Experienced software engineer with 5 years of experience. Proficient in python, java, and c++. Bachelor's degree.";

fn fixture(name: &str) -> PathBuf {
    Path::new("tests/fixtures").join(name)
}

fn jaccard_pipeline() -> ScreeningPipeline {
    ScreeningPipeline::new(
        RoleCatalog::builtin(),
        ScoringConfig::default(),
        Arc::new(JaccardSimilarity),
        Arc::new(FixedFallback::new(1)),
    )
    .unwrap()
}

fn tfidf_pipeline() -> ScreeningPipeline {
    ScreeningPipeline::new(
        RoleCatalog::builtin(),
        ScoringConfig::default(),
        Arc::new(TfIdfSimilarity),
        Arc::new(FixedFallback::new(1)),
    )
    .unwrap()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let manager = InputManager::new();
    let path = fixture("sample_resume.txt");

    let result = manager.extract_text(&path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("C++"));
    assert!(text.contains("6 years of experience"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let manager = InputManager::new();
    let path = fixture("sample_resume.md");

    let text = manager.extract_text(&path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("Python"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let manager = InputManager::new();
    let path = fixture("sample_resume.txt");

    let text1 = manager.extract_text(&path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(&path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let manager = InputManager::new();
    let result = manager.extract_text(&fixture("unsupported.xyz")).await;
    assert!(matches!(result, Err(ResumeRankerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let manager = InputManager::new();
    let result = manager.extract_text(&fixture("nonexistent.txt")).await;
    assert!(result.is_err());
}

#[test]
fn test_software_engineer_end_to_end() {
    let candidates = vec![Candidate::new("1", "se.txt", SE_RESUME)];

    for pipeline in [jaccard_pipeline(), tfidf_pipeline()] {
        let results = pipeline.run(JOB_TEXT, &candidates, "Software Engineer").unwrap();
        assert_eq!(results.len(), 1);

        let result = &results[0];
        for skill in ["python", "java", "c++"] {
            assert!(result.skills.contains(&skill.to_string()), "missing {}", skill);
        }
        assert!(result.qualifications.contains(&"bachelor".to_string()));
        assert_eq!(result.experience, 5);
        assert!(!result.experience_inferred);
        assert!(result.score > 0.5, "score {} too low", result.score);
        assert!(result.score <= 1.0);
    }
}

#[test]
fn test_resume_without_keywords_scores_low() {
    let candidates = vec![Candidate::new(
        "1",
        "chef.txt",
        "Enthusiastic chef who enjoys cooking pasta and baking bread.",
    )];

    let results = jaccard_pipeline().run(JOB_TEXT, &candidates, "Software Engineer").unwrap();
    let result = &results[0];
    assert!(result.skills.is_empty());
    assert!(result.qualifications.is_empty());
    assert_eq!(result.experience, 1);
    assert!(result.experience_inferred);
    assert!(result.score < 0.3);
}

#[test]
fn test_zero_resumes() {
    let results = jaccard_pipeline().run(JOB_TEXT, &[], "Software Engineer").unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_unknown_role_still_ranks() {
    let candidates = vec![Candidate::new("1", "se.txt", SE_RESUME)];
    let report = jaccard_pipeline()
        .screen_candidates("inline", JOB_TEXT, &candidates, "Astronaut")
        .unwrap();

    assert!(!report.role_known);
    assert_eq!(report.results.len(), 1);
    assert!(report.results[0].skills.is_empty());
    assert!(report.results[0].qualifications.is_empty());
}

#[tokio::test]
async fn test_screen_skips_unreadable_resumes() {
    let pipeline = tfidf_pipeline();
    let resumes = vec![
        fixture("chef_resume.txt"),
        fixture("missing_resume.txt"),
        fixture("software_engineer_resume.txt"),
        fixture("unsupported.xyz"),
        fixture("broken.pdf"),
    ];
    let (sender, mut receiver) = unbounded_channel();

    let report = pipeline
        .screen(
            &fixture("job_description.txt"),
            &resumes,
            "Software Engineer",
            EventSink::new(sender),
        )
        .await
        .unwrap();

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.skipped.len(), 3);
    assert_eq!(report.submitted(), 5);
    assert_eq!(report.results[0].name, "software_engineer_resume.txt");
    assert_eq!(report.results[0].id, "3");
    assert_eq!(report.results[1].name, "chef_resume.txt");
    assert!(report.results[0].score > 0.5);
    assert!(report.results[1].score < 0.3);

    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(skipped, vec!["2", "4", "5"]);

    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    assert!(matches!(events.first(), Some(PipelineEvent::Started { total: 5, .. })));
    assert!(matches!(
        events.last(),
        Some(PipelineEvent::Completed { ranked: 2, skipped: 3 })
    ));
}

#[tokio::test]
async fn test_missing_job_description_is_fatal() {
    let result = jaccard_pipeline()
        .screen(
            &fixture("no_such_job.txt"),
            &[fixture("software_engineer_resume.txt")],
            "Software Engineer",
            EventSink::none(),
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_pipeline_from_config_and_store() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.processing.similarity = SimilarityMethod::Jaccard;
    config.output.results_dir = temp.path().join("runs");

    let pipeline = ScreeningPipeline::from_config(&config).unwrap();
    let report = pipeline
        .screen(
            &fixture("job_description.txt"),
            &[fixture("software_engineer_resume.txt"), fixture("sample_resume.md")],
            "Software Engineer",
            EventSink::none(),
        )
        .await
        .unwrap();
    assert_eq!(report.similarity_method, "jaccard");

    let store = ResultStore::open(config.results_dir()).await.unwrap();
    store.save(&report).await.unwrap();
    let loaded = store.resolve("latest").await.unwrap();
    assert_eq!(loaded, report);

    let rows = parse_csv(&to_csv(&loaded.results).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, loaded.results[0].name);
    assert_eq!(rows[0].skills, loaded.results[0].skills);
    assert!(rows[0].score >= rows[1].score);
}
