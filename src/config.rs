//! Configuration management for resume fit

use crate::error::{Result, ResumeFitError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub skills: SkillsConfig,
    pub reconciliation: ReconciliationConfig,
    pub labeling: LabelingConfig,
    pub training: TrainingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
    pub classifier_path: PathBuf,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    /// Ordered skill vocabulary used for explanations
    pub vocabulary: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Coverage below which a Good Fit prediction drops to Average Fit.
    /// Average Fit drops to Poor Fit below half of this value.
    pub coverage_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelingConfig {
    pub good_fit_similarity: f32,
    pub average_fit_similarity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub seed: u64,
    pub negative_fraction: f32,
    pub test_fraction: f32,
    pub max_iter: usize,
    pub learning_rate: f64,
    pub l2_penalty: f64,
    pub balanced_class_weights: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-fit")
            .join("models");
        let classifier_path = models_dir.join("fit_classifier.json");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
                classifier_path,
                batch_size: 32,
            },
            skills: SkillsConfig {
                vocabulary: default_vocabulary(),
            },
            reconciliation: ReconciliationConfig {
                coverage_threshold: 0.30,
            },
            labeling: LabelingConfig {
                good_fit_similarity: 0.70,
                average_fit_similarity: 0.40,
            },
            training: TrainingConfig {
                seed: 42,
                negative_fraction: 0.6,
                test_fraction: 0.2,
                max_iter: 1000,
                learning_rate: 0.5,
                l2_penalty: 1.0,
                balanced_class_weights: true,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeFitError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeFitError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-fit")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f32| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ResumeFitError::Configuration(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )))
            }
        };

        unit("reconciliation.coverage_threshold", self.reconciliation.coverage_threshold)?;
        unit("labeling.good_fit_similarity", self.labeling.good_fit_similarity)?;
        unit("labeling.average_fit_similarity", self.labeling.average_fit_similarity)?;

        if self.labeling.average_fit_similarity >= self.labeling.good_fit_similarity {
            return Err(ResumeFitError::Configuration(
                "labeling.average_fit_similarity must be below labeling.good_fit_similarity".to_string(),
            ));
        }

        for (name, value) in [
            ("training.negative_fraction", self.training.negative_fraction),
            ("training.test_fraction", self.training.test_fraction),
        ] {
            if value <= 0.0 || value >= 1.0 {
                return Err(ResumeFitError::Configuration(format!(
                    "{} must be strictly between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        if self.models.batch_size == 0 {
            return Err(ResumeFitError::Configuration(
                "models.batch_size must be at least 1".to_string(),
            ));
        }

        if self.skills.vocabulary.iter().all(|s| s.trim().is_empty()) {
            return Err(ResumeFitError::Configuration(
                "skills.vocabulary must contain at least one entry".to_string(),
            ));
        }

        Ok(())
    }

    pub fn get_models_dir(&self) -> PathBuf {
        self.models.models_dir.clone()
    }
}

/// Built-in skill vocabulary, in display order
pub fn default_vocabulary() -> Vec<String> {
    [
        // Languages
        "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust",
        "scala", "kotlin", "ruby", "php", "r", "sql",
        // Web and APIs
        "html", "css", "react", "angular", "vue", "node.js", "django", "flask",
        "spring", "rest api", "graphql", "microservices",
        // Data
        "postgresql", "mysql", "mongodb", "redis", "kafka", "spark", "hadoop",
        "airflow", "pandas", "numpy", "tableau", "power bi", "excel", "etl",
        // Machine learning
        "machine learning", "deep learning", "nlp", "tensorflow", "pytorch",
        "scikit-learn", "data analysis", "statistics",
        // Infrastructure
        "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "linux",
        "git", "ci/cd", "jenkins",
        // Practices
        "agile", "scrum", "testing", "project management", "communication",
        "leadership",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reconciliation.coverage_threshold, 0.30);
        assert_eq!(config.labeling.good_fit_similarity, 0.70);
        assert_eq!(config.labeling.average_fit_similarity, 0.40);
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.skills.vocabulary, default_vocabulary());
    }

    #[test]
    fn test_round_trip_keeps_custom_vocabulary() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.skills.vocabulary = vec!["elixir".to_string(), "phoenix".to_string()];
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.skills.vocabulary, vec!["elixir", "phoenix"]);
    }

    #[test]
    fn test_validation_rejects_inverted_thresholds() {
        let mut config = Config::default();
        config.labeling.average_fit_similarity = 0.8;
        assert!(matches!(config.validate(), Err(ResumeFitError::Configuration(_))));
    }

    #[test]
    fn test_validation_rejects_out_of_range_coverage() {
        let mut config = Config::default();
        config.reconciliation.coverage_threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
