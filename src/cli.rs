//! CLI interface for resume-fit

use crate::config::OutputFormat;
use crate::input::InputSource;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-fit")]
#[command(about = "Resume and job description fit prediction")]
#[command(
    long_about = "Predict how well a resume fits a job description with sentence embeddings and a trained classifier, then explain the prediction with skill coverage"
)]
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

/// Resume and job description, each from a file or inline text
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to resume file (PDF, TXT, MD)
    #[arg(short, long, conflicts_with = "resume_text")]
    pub resume: Option<PathBuf>,

    /// Resume text given inline
    #[arg(long)]
    pub resume_text: Option<String>,

    /// Path to job description file (TXT, MD)
    #[arg(short, long, conflicts_with = "job_text")]
    pub job: Option<PathBuf>,

    /// Job description text given inline
    #[arg(long)]
    pub job_text: Option<String>,
}

impl InputArgs {
    pub fn resume_source(&self) -> Option<InputSource> {
        source_from(self.resume.as_ref(), self.resume_text.as_ref())
    }

    pub fn job_source(&self) -> Option<InputSource> {
        source_from(self.job.as_ref(), self.job_text.as_ref())
    }
}

fn source_from(path: Option<&PathBuf>, text: Option<&String>) -> Option<InputSource> {
    match (path, text) {
        (Some(path), _) => Some(InputSource::File(path.clone())),
        (None, Some(text)) => Some(InputSource::Inline(text.clone())),
        (None, None) => None,
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the fit of a resume for a job description
    Match {
        #[command(flatten)]
        input: InputArgs,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file or directory
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include probabilities, skill sets and timing
        #[arg(short, long)]
        detailed: bool,

        /// Use TF-IDF similarity instead of embeddings and the classifier
        #[arg(long)]
        lexical: bool,

        /// Embedding model to use
        #[arg(short, long)]
        embedding: Option<String>,
    },

    /// Show matched and missing skills without running a model
    Explain {
        #[command(flatten)]
        input: InputArgs,

        /// Print the explanation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply the skill coverage rule to a predicted label
    Reconcile {
        /// Predicted label, e.g. "Good Fit"
        label: String,

        /// Skill coverage ratio in [0, 1]
        coverage: f32,
    },

    /// List vocabulary skills found in a text
    Skills {
        /// Path to a text file (PDF, TXT, MD)
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Inline text
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Train the fit classifier from a labelled resume dataset
    Train {
        /// CSV file with Resume and Category columns
        #[arg(short, long)]
        dataset: PathBuf,

        /// Where to write the classifier (defaults to the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Embedding model to use
        #[arg(short, long)]
        embedding: Option<String>,
    },

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download a model
    Download {
        /// Model id, name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a downloaded model
    Remove {
        model: String,
    },

    /// Show model information
    Info {
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt", "md"]).is_ok());
        assert!(validate_file_extension(Path::new("job.pdf"), &["txt", "md"]).is_err());
        assert!(validate_file_extension(Path::new("job"), &["txt"]).is_err());
    }

    #[test]
    fn test_match_with_inline_text() {
        let cli = Cli::try_parse_from([
            "resume-fit",
            "match",
            "--resume-text",
            "Python developer",
            "--job",
            "job.md",
            "--lexical",
        ])
        .unwrap();

        match cli.command {
            Commands::Match { input, lexical, .. } => {
                assert!(lexical);
                assert_eq!(input.resume_source(), Some(InputSource::Inline("Python developer".to_string())));
                assert_eq!(input.job_source(), Some(InputSource::File(PathBuf::from("job.md"))));
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_file_and_text_conflict() {
        let result = Cli::try_parse_from([
            "resume-fit",
            "explain",
            "--resume",
            "cv.txt",
            "--resume-text",
            "Python",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_reconcile_args() {
        let cli = Cli::try_parse_from(["resume-fit", "reconcile", "Good Fit", "0.1"]).unwrap();
        match cli.command {
            Commands::Reconcile { label, coverage } => {
                assert_eq!(label, "Good Fit");
                assert!((coverage - 0.1).abs() < 1e-6);
            }
            _ => panic!("expected reconcile command"),
        }
    }
}
