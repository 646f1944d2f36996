//! Input manager for handling different file types

use crate::error::{Result, ResumeRankerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Routes files to the right extractor and caches extracted text by path.
///
/// Clones share one cache, so a manager can be handed to concurrent tasks.
#[derive(Clone)]
pub struct InputManager {
    cache: Arc<Mutex<HashMap<PathBuf, String>>>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached_text) = self.cached(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached_text);
            }
        }

        if !path.exists() {
            return Err(ResumeRankerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ResumeRankerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.lock_cache().insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    /// Like [`extract_text`](Self::extract_text), failing with
    /// `ExtractionTimeout` if the extractor stalls.
    pub async fn extract_with_timeout(&self, path: &Path, limit: Duration) -> Result<String> {
        match tokio::time::timeout(limit, self.extract_text(path)).await {
            Ok(result) => result,
            Err(_) => Err(ResumeRankerError::ExtractionTimeout {
                path: path.display().to_string(),
                seconds: limit.as_secs(),
            }),
        }
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    pub fn cache_size(&self) -> usize {
        self.lock_cache().len()
    }

    fn cached(&self, path: &Path) -> Option<String> {
        self.lock_cache().get(path).cloned()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, String>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
