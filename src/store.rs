//! On-disk store of past screening runs, one JSON file per run

use crate::error::{Result, ResumeRankerError};
use crate::output::report::RunReport;
use log::{debug, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const RUN_EXTENSION: &str = "json";

/// Keeps [`RunReport`]s under a directory, keyed by run id.
///
/// Run ids are UTC timestamps, so lexical order is chronological order.
pub struct ResultStore {
    runs_dir: PathBuf,
}

impl ResultStore {
    /// Open the store, creating the directory if needed.
    pub async fn open(runs_dir: impl Into<PathBuf>) -> Result<Self> {
        let runs_dir = runs_dir.into();
        if !runs_dir.exists() {
            fs::create_dir_all(&runs_dir).await.map_err(|e| {
                ResumeRankerError::Store(format!(
                    "Failed to create results directory {}: {}",
                    runs_dir.display(),
                    e
                ))
            })?;
        }
        Ok(Self { runs_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.runs_dir
    }

    /// Persist a report and return the file it was written to.
    ///
    /// A stored run is never overwritten; saving a second report with the
    /// same run id fails.
    pub async fn save(&self, report: &RunReport) -> Result<PathBuf> {
        let path = self.run_path(&report.run_id)?;
        let json = serde_json::to_string_pretty(report)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => ResumeRankerError::Store(format!(
                    "A run with id {} is already stored",
                    report.run_id
                )),
                _ => ResumeRankerError::Io(e),
            })?;
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;
        info!("Saved run {} to {}", report.run_id, path.display());
        Ok(path)
    }

    pub async fn load(&self, run_id: &str) -> Result<RunReport> {
        let path = self.run_path(run_id)?;
        if !path.exists() {
            return Err(ResumeRankerError::Store(format!("No stored run with id {}", run_id)));
        }
        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Most recent run, if any has been stored.
    pub async fn latest(&self) -> Result<Option<RunReport>> {
        match self.list().await?.pop() {
            Some(run_id) => Ok(Some(self.load(&run_id).await?)),
            None => Ok(None),
        }
    }

    /// Stored run ids, oldest first.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.runs_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RUN_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_run_id(stem) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Remove every stored run; returns how many were deleted.
    pub async fn clear(&self) -> Result<usize> {
        let ids = self.list().await?;
        for run_id in &ids {
            let path = self.run_path(run_id)?;
            fs::remove_file(&path).await?;
            debug!("Removed {}", path.display());
        }
        Ok(ids.len())
    }

    /// Resolve `latest` or an explicit run id.
    pub async fn resolve(&self, selector: &str) -> Result<RunReport> {
        if selector.eq_ignore_ascii_case("latest") {
            self.latest()
                .await?
                .ok_or_else(|| ResumeRankerError::Store("No runs have been stored yet".to_string()))
        } else {
            self.load(selector).await
        }
    }

    fn run_path(&self, run_id: &str) -> Result<PathBuf> {
        if !is_valid_run_id(run_id) {
            return Err(ResumeRankerError::Store(format!("Invalid run id: {}", run_id)));
        }
        Ok(self.runs_dir.join(format!("{}.{}", run_id, RUN_EXTENSION)))
    }
}

fn is_valid_run_id(run_id: &str) -> bool {
    !run_id.is_empty() && run_id.chars().all(|c| c.is_ascii_alphanumeric())
}
