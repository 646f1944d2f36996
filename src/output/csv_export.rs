//! CSV export of ranked results

use crate::error::{Result, ResumeRankerError};
use crate::processing::candidate::ScoreResult;
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde::Deserialize;

const HEADERS: [&str; 6] = ["Name", "Score", "Experience", "Skills", "Qualifications", "Preview"];
const LIST_SEPARATOR: &str = ", ";

/// One parsed row of an exported CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub name: String,
    pub score: f32,
    pub experience: u32,
    pub skills: Vec<String>,
    pub qualifications: Vec<String>,
    pub preview: String,
}

#[derive(Deserialize)]
struct RawRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Score")]
    score: f32,
    #[serde(rename = "Experience")]
    experience: u32,
    #[serde(rename = "Skills")]
    skills: String,
    #[serde(rename = "Qualifications")]
    qualifications: String,
    #[serde(rename = "Preview")]
    preview: String,
}

fn split_list(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field.split(LIST_SEPARATOR).map(|s| s.to_string()).collect()
}

/// Render results as CSV, in the order given.
///
/// Every field is double-quoted with embedded quotes doubled, so text that
/// looks numeric (a file named `2024.pdf`, a preview of digits) stays text.
/// The score is written with two decimals.
pub fn to_csv(results: &[ScoreResult]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for result in results {
        let score = format!("{:.2}", result.score);
        let experience = result.experience.to_string();
        let skills = result.skills.join(LIST_SEPARATOR);
        let qualifications = result.qualifications.join(LIST_SEPARATOR);
        writer.write_record([
            result.name.as_str(),
            score.as_str(),
            experience.as_str(),
            skills.as_str(),
            qualifications.as_str(),
            result.preview.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ResumeRankerError::OutputFormatting(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ResumeRankerError::OutputFormatting(format!("CSV is not valid UTF-8: {}", e)))
}

/// Parse CSV produced by [`to_csv`].
pub fn parse_csv(data: &str) -> Result<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    for record in reader.deserialize::<RawRow>() {
        let raw = record?;
        rows.push(CsvRow {
            name: raw.name,
            score: raw.score,
            experience: raw.experience,
            skills: split_list(&raw.skills),
            qualifications: split_list(&raw.qualifications),
            preview: raw.preview,
        });
    }
    Ok(rows)
}
