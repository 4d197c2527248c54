//! Input manager for files and inline text

use crate::error::{Result, ResumeFitError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{info, warn};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter both resume and job description text.";

/// Where a resume or job description comes from
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    File(PathBuf),
    Inline(String),
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::File(path) => write!(f, "{}", path.display()),
            InputSource::Inline(_) => write!(f, "<inline text>"),
        }
    }
}

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub async fn read_resume(&mut self, source: &InputSource) -> Result<String> {
        match source {
            InputSource::File(path) => self.extract_text(path).await,
            InputSource::Inline(text) => Ok(text.clone()),
        }
    }

    pub async fn read_job(&mut self, source: &InputSource) -> Result<String> {
        match source {
            InputSource::File(path) => {
                let file_type = FileType::from_path(path);
                if !file_type.allowed_for_job() {
                    return Err(ResumeFitError::UnsupportedFormat(format!(
                        "Job descriptions must be .txt or .md files: {}",
                        path.display()
                    )));
                }
                self.extract_text(path).await
            }
            InputSource::Inline(text) => Ok(text.clone()),
        }
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(cached_text) = self.cache.get(path) {
            info!("Using cached text for: {}", path.display());
            return Ok(cached_text.clone());
        }

        if !path.exists() {
            return Err(ResumeFitError::InvalidInput(format!(
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
                return Err(ResumeFitError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        self.cache.insert(path.to_path_buf(), text.clone());
        Ok(text)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Reject a pair where either side is blank
pub fn require_both(resume_text: &str, job_text: &str) -> Result<()> {
    if resume_text.trim().is_empty() || job_text.trim().is_empty() {
        warn!("{}", EMPTY_INPUT_MESSAGE);
        return Err(ResumeFitError::InvalidInput(EMPTY_INPUT_MESSAGE.to_string()));
    }
    Ok(())
}
