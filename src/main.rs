//! Resume ranker: score and rank resumes against a job description

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_ranker::cli::{self, Cli, Commands, ConfigAction, ResultsAction};
use resume_ranker::config::{Config, OutputFormat};
use resume_ranker::output::formatter::{save_report_to_file, suggest_filename};
use resume_ranker::output::{ReportGenerator, RunReport};
use resume_ranker::processing::events::{EventSink, PipelineEvent};
use resume_ranker::processing::pipeline::ScreeningPipeline;
use resume_ranker::store::ResultStore;
use std::path::PathBuf;
use std::process;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "md"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Rank {
            job,
            resumes,
            role,
            output,
            save,
            detailed,
            similarity,
            no_store,
        } => {
            cli::validate_file_extension(&job, &SUPPORTED_EXTENSIONS)
                .map_err(anyhow::Error::msg)
                .context("Job description file")?;
            // Unsupported resumes are skipped by the pipeline rather than rejected here.

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(anyhow::Error::msg)?,
                None => config.output.format,
            };
            if let Some(method) = similarity {
                config.processing.similarity = cli::parse_similarity(&method).map_err(anyhow::Error::msg)?;
            }
            let detailed = detailed || config.output.detailed;

            let pipeline =
                ScreeningPipeline::from_config(&config).context("Failed to build screening pipeline")?;

            info!("Starting resume screening for role: {}", role);
            let (sender, receiver) = unbounded_channel();
            let progress = tokio::spawn(track_progress(receiver, resumes.len()));

            let report = pipeline
                .screen(&job, &resumes, &role, EventSink::new(sender))
                .await
                .with_context(|| format!("Failed to screen resumes against {}", job.display()))?;
            progress.await.context("Progress display task failed")?;

            if !no_store && config.output.store_results {
                let store = ResultStore::open(config.results_dir()).await?;
                let path = store.save(&report).await?;
                info!("Run {} stored at {}", report.run_id, path.display());
            }

            emit_report(&config, &report, output_format, detailed, save)?;
        }

        Commands::Roles => {
            println!("{}", "Available roles".bold());
            for name in config.roles.role_names() {
                let profile = config.roles.lookup(name);
                println!("  • {}", name.cyan());
                println!("    skills: {}", profile.skills.join(", "));
                println!("    degrees: {}", profile.degrees.join(", "));
            }
        }

        Commands::Results { action } => {
            let store = ResultStore::open(config.results_dir()).await?;
            match action {
                ResultsAction::List => {
                    let ids = store.list().await?;
                    if ids.is_empty() {
                        println!("No stored runs in {}", store.dir().display());
                    }
                    for run_id in ids {
                        let report = store.load(&run_id).await?;
                        let best = report
                            .best()
                            .map(|r| format!("{} ({:.1}%)", r.name, r.score * 100.0))
                            .unwrap_or_else(|| "-".to_string());
                        println!(
                            "{}  {:<28} {} ranked, {} skipped, best: {}",
                            run_id,
                            report.role,
                            report.results.len(),
                            report.skipped.len(),
                            best
                        );
                    }
                }

                ResultsAction::Show { run, output } => {
                    let report = store.resolve(&run).await?;
                    let output_format = match output {
                        Some(format) => cli::parse_output_format(&format).map_err(anyhow::Error::msg)?,
                        None => config.output.format,
                    };
                    emit_report(&config, &report, output_format, true, None)?;
                }

                ResultsAction::Export { run, save } => {
                    let report = store.resolve(&run).await?;
                    emit_report(&config, &report, OutputFormat::Csv, false, Some(save))?;
                }

                ResultsAction::Clear => {
                    let removed = store.clear().await?;
                    println!("Removed {} stored run(s)", removed);
                }
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("{}", "Current Configuration".bold());
                    println!("Config file: {}", path.display());
                    println!("Results directory: {}", config.results_dir().display());
                    println!("\nScoring Weights:");
                    println!("  Similarity: {:.1}%", config.scoring.similarity_weight * 100.0);
                    println!("  Experience: {:.1}%", config.scoring.experience_weight * 100.0);
                    println!("  Skills: {:.1}%", config.scoring.skills_weight * 100.0);
                    println!("  Qualifications: {:.1}%", config.scoring.qualifications_weight * 100.0);
                    println!("\nSaturation:");
                    println!("  Experience cap: {} years", config.scoring.experience_cap_years);
                    println!("  Skills target: {}", config.scoring.skills_target);
                    println!("  Qualifications target: {}", config.scoring.qualifications_target);
                    println!("\nProcessing:");
                    println!("  Similarity: {:?}", config.processing.similarity);
                    println!(
                        "  Experience fallback: {:?}",
                        config.processing.experience_fallback.strategy
                    );
                    println!("  Extraction timeout: {}s", config.processing.extraction_timeout_secs);
                    println!("  Roles in catalog: {}", config.roles.len());
                }

                Some(ConfigAction::Reset) => {
                    Config::default()
                        .save_to(&path)
                        .with_context(|| format!("Failed to reset {}", path.display()))?;
                    println!("Configuration reset to defaults at {}", path.display());
                }

                Some(ConfigAction::Path) => println!("{}", path.display()),
            }
        }
    }

    Ok(())
}

/// Drive a progress bar from pipeline events until the sender is dropped.
async fn track_progress(mut receiver: UnboundedReceiver<PipelineEvent>, total: usize) {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} resumes {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    while let Some(event) = receiver.recv().await {
        match &event {
            PipelineEvent::Extracted { .. } | PipelineEvent::Skipped { .. } => {
                pb.inc(1);
                pb.set_message(event.message());
            }
            PipelineEvent::Completed { .. } => pb.finish_with_message(event.message()),
            _ => pb.set_message(event.message()),
        }
    }

    if !pb.is_finished() {
        pb.finish_and_clear();
    }
}

fn emit_report(
    config: &Config,
    report: &RunReport,
    format: OutputFormat,
    detailed: bool,
    save: Option<PathBuf>,
) -> Result<()> {
    let use_colors = config.output.color_output && save.is_none();
    let generator = ReportGenerator::with_options(use_colors, detailed, true, true);
    let content = generator.generate_report(report, &format)?;

    match save {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(suggest_filename(&format, &report.role, true))
            } else {
                path
            };
            save_report_to_file(&content, &path)?;
            println!("Report saved to {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}
