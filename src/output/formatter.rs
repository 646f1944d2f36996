//! Output formatters for ranked screening results

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::csv_export;
use crate::output::report::RunReport;
use crate::processing::candidate::ScoreResult;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting run reports
pub trait OutputFormatter {
    fn format_report(&self, report: &RunReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console table with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and storage
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing results
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// CSV export of the ranked table
pub struct CsvFormatter;

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    csv_formatter: CsvFormatter,
}

fn percent(score: f32) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            80..=100 => ("STRONG", Color::Green),
            60..=79 => ("GOOD", Color::BrightGreen),
            40..=59 => ("FAIR", Color::Yellow),
            _ => ("WEAK", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_candidate(&self, rank: usize, result: &ScoreResult) -> String {
        let score = percent(result.score);
        let experience = if result.experience_inferred {
            format!("{}y (assumed)", result.experience)
        } else {
            format!("{}y", result.experience)
        };

        let mut line = format!(
            "{:>3}. {:<32} {:>3}% {:<8} exp {:<13} skills: {} | degrees: {}\n",
            rank,
            result.name,
            score,
            self.format_score_badge(score),
            experience,
            join_or_dash(&result.skills),
            join_or_dash(&result.qualifications),
        );

        if self.detailed {
            let b = &result.breakdown;
            line.push_str(&format!(
                "     similarity {:.1}% | breakdown: similarity {:.3} + experience {:.3} + skills {:.3} + degrees {:.3}\n",
                result.similarity * 100.0,
                b.similarity,
                b.experience,
                b.skills,
                b.qualifications
            ));
            if !result.preview.is_empty() {
                let preview = result.preview.replace(['\n', '\r'], " ");
                line.push_str(&format!("     {}\n", self.colorize(&preview, Color::BrightBlack)));
            }
        }

        line
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("CANDIDATE RANKING", 1));
        output.push_str(&format!(
            "Role: {} | Run: {} | Generated: {} | Processing time: {}ms\n",
            self.colorize(&report.role, Color::Cyan),
            report.run_id,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.processing_time_ms
        ));
        if !report.role_known {
            output.push_str(&self.colorize(
                "Role not found in catalog: skills and degrees were not matched\n",
                Color::Yellow,
            ));
        }
        if let Some(average) = report.average_score() {
            output.push_str(&format!("Average score: {}%\n", percent(average)));
        }
        if self.detailed {
            output.push_str(&format!(
                "Job description: {} | Similarity: {} | Experience fallback: {}\n",
                report.job_source, report.similarity_method, report.experience_fallback
            ));
        }

        output.push_str(&self.format_header(
            &format!("Ranked Candidates ({} of {})", report.results.len(), report.submitted()),
            2,
        ));
        if report.results.is_empty() {
            output.push_str("No candidates were ranked.\n");
        }
        for (index, result) in report.results.iter().enumerate() {
            output.push_str(&self.format_candidate(index + 1, result));
        }

        if !report.skipped.is_empty() {
            output.push_str(&self.format_header("Skipped Resumes", 3));
            for skipped in &report.skipped {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    self.colorize("✗", Color::Red),
                    skipped.name,
                    skipped.reason
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RunReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace(['\n', '\r'], " ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("# Candidate Ranking: {}\n\n", Self::escape_cell(&report.role)));

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Run:** `{}` | **Processing Time:** {}ms\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.run_id,
                report.processing_time_ms
            ));
            output.push_str(&format!(
                "**Job description:** `{}` | **Similarity:** {} | **Experience fallback:** {}\n\n",
                report.job_source, report.similarity_method, report.experience_fallback
            ));
        }

        output.push_str("| Rank | Name | Score | Experience | Skills | Qualifications |\n");
        output.push_str("|---:|---|---:|---:|---|---|\n");
        for (index, result) in report.results.iter().enumerate() {
            let experience = if result.experience_inferred {
                format!("{}*", result.experience)
            } else {
                result.experience.to_string()
            };
            output.push_str(&format!(
                "| {} | {} | {}% | {} | {} | {} |\n",
                index + 1,
                Self::escape_cell(&result.name),
                percent(result.score),
                experience,
                Self::escape_cell(&join_or_dash(&result.skills)),
                Self::escape_cell(&join_or_dash(&result.qualifications)),
            ));
        }

        if report.results.iter().any(|r| r.experience_inferred) {
            output.push_str("\n\\* no experience stated; fallback value\n");
        }

        if !report.skipped.is_empty() {
            output.push_str("\n## Skipped Resumes\n\n");
            for skipped in &report.skipped {
                output.push_str(&format!(
                    "- `{}`: {}\n",
                    skipped.name,
                    Self::escape_cell(&skipped.reason)
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, report: &RunReport) -> Result<String> {
        csv_export::to_csv(&report.results)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            csv_formatter: CsvFormatter,
        }
    }

    pub fn generate_report(&self, report: &RunReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Csv => self.csv_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, role: &str, timestamp: bool) -> String {
    let base_name: String = role
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_ranking{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_ranking{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_ranking{}.md", base_name, timestamp_suffix),
        OutputFormat::Csv => format!("{}_ranking{}.csv", base_name, timestamp_suffix),
    }
}
