//! CLI interface for the resume ranker

use crate::config::{OutputFormat, SimilarityMethod};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Rank resumes against a job description for a target role")]
#[command(long_about = "Score a batch of resumes against one job description using text similarity, stated experience, role skills and degrees, then rank the candidates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank resumes against a job description
    Rank {
        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Paths to resume files (PDF, TXT, MD)
        #[arg(short, long = "resume", required = true, num_args = 1..)]
        resumes: Vec<PathBuf>,

        /// Target role, e.g. "Software Engineer"
        #[arg(long)]
        role: String,

        /// Output format: console, json, markdown, csv
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show score breakdowns, previews and skipped resumes
        #[arg(short, long)]
        detailed: bool,

        /// Similarity estimator: tfidf or jaccard
        #[arg(long)]
        similarity: Option<String>,

        /// Do not record this run in the results store
        #[arg(long)]
        no_store: bool,
    },

    /// List the roles in the catalog
    Roles,

    /// Inspect stored runs
    Results {
        #[command(subcommand)]
        action: ResultsAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ResultsAction {
    /// List stored runs
    List,

    /// Show a stored run
    Show {
        /// Run id, or "latest"
        run: String,

        /// Output format: console, json, markdown, csv
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Export a stored run as CSV
    Export {
        /// Run id, or "latest"
        run: String,

        /// Destination file
        #[arg(short, long)]
        save: PathBuf,
    },

    /// Delete all stored runs
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "csv" => Ok(OutputFormat::Csv),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, csv", format)),
    }
}

pub fn parse_similarity(method: &str) -> Result<SimilarityMethod, String> {
    match method.to_lowercase().as_str() {
        "tfidf" | "tf-idf" => Ok(SimilarityMethod::TfIdf),
        "jaccard" => Ok(SimilarityMethod::Jaccard),
        _ => Err(format!("Invalid similarity method: {}. Supported: tfidf, jaccard", method)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
