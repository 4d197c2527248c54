//! Persisted fit classifier

use crate::classifier::logistic::{LogisticRegression, NUM_CLASSES};
use crate::error::{Result, ResumeFitError};
use crate::processing::reconciler::FitLabel;
use chrono::{DateTime, Utc};
use log::info;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk layout of a trained classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClassifierFile {
    embedding_model: String,
    classes: Vec<String>,
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    metadata: TrainingMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub trained_at: DateTime<Utc>,
    pub training_samples: usize,
    pub test_samples: usize,
    pub class_distribution: [usize; NUM_CLASSES],
    pub test_accuracy: f32,
}

/// Logistic regression over pair embeddings, tied to the embedding model it was trained on
#[derive(Debug, Clone)]
pub struct FitClassifier {
    model: LogisticRegression,
    embedding_model: String,
    metadata: TrainingMetadata,
}

impl FitClassifier {
    pub fn new(model: LogisticRegression, embedding_model: String, metadata: TrainingMetadata) -> Self {
        Self {
            model,
            embedding_model,
            metadata,
        }
    }

    /// Probabilities ordered Poor, Average, Good
    pub fn predict_proba(&self, features: &[f32]) -> Result<[f32; NUM_CLASSES]> {
        let features: Vec<f64> = features.iter().map(|&v| v as f64).collect();
        let probabilities = self.model.predict_proba_one(ArrayView1::from(&features))?;
        Ok(probabilities.map(|p| p as f32))
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn metadata(&self) -> &TrainingMetadata {
        &self.metadata
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = ClassifierFile {
            embedding_model: self.embedding_model.clone(),
            classes: FitLabel::ALL.iter().map(|l| l.display_name().to_string()).collect(),
            weights: self.model.weights().outer_iter().map(|row| row.to_vec()).collect(),
            intercepts: self.model.intercepts().to_vec(),
            metadata: self.metadata.clone(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;

        info!("Classifier saved to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ResumeFitError::ModelNotFound(format!(
                "No trained classifier at {}. Run `resume-fit train` first",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let file: ClassifierFile = serde_json::from_str(&content)?;

        let expected: Vec<&str> = FitLabel::ALL.iter().map(|l| l.display_name()).collect();
        if file.classes != expected {
            return Err(ResumeFitError::ModelError(format!(
                "Unexpected classifier classes: {:?}",
                file.classes
            )));
        }

        let n_features = file.weights.first().map(|row| row.len()).unwrap_or(0);
        if file.weights.iter().any(|row| row.len() != n_features) {
            return Err(ResumeFitError::ModelError(
                "Classifier weight rows have different lengths".to_string(),
            ));
        }

        let flat: Vec<f64> = file.weights.into_iter().flatten().collect();
        let rows = flat.len().checked_div(n_features).unwrap_or(0);
        let weights = Array2::from_shape_vec((rows, n_features), flat)
            .map_err(|e| ResumeFitError::ModelError(format!("Malformed classifier weights: {}", e)))?;
        let model = LogisticRegression::from_parts(weights, Array1::from(file.intercepts))?;

        info!(
            "Loaded classifier for {} ({} features) from {}",
            file.embedding_model,
            model.n_features(),
            path.display()
        );

        Ok(Self::new(model, file.embedding_model, file.metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::TempDir;

    fn metadata() -> TrainingMetadata {
        TrainingMetadata {
            trained_at: Utc::now(),
            training_samples: 3,
            test_samples: 0,
            class_distribution: [1, 1, 1],
            test_accuracy: 0.0,
        }
    }

    fn classifier() -> FitClassifier {
        let model = LogisticRegression::from_parts(
            array![[-1.0, 0.0], [0.0, 0.0], [1.0, 0.0]],
            array![0.0, 0.5, 0.0],
        )
        .unwrap();
        FitClassifier::new(model, "toy".to_string(), metadata())
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models").join("classifier.json");

        let original = classifier();
        original.save(&path).unwrap();
        let loaded = FitClassifier::load(&path).unwrap();

        assert_eq!(loaded.embedding_model(), "toy");
        assert_eq!(loaded.n_features(), 2);
        assert_eq!(
            loaded.predict_proba(&[3.0, 1.0]).unwrap(),
            original.predict_proba(&[3.0, 1.0]).unwrap()
        );
    }

    #[test]
    fn test_predict_proba_orders_classes() {
        let probabilities = classifier().predict_proba(&[5.0, 0.0]).unwrap();
        assert!(probabilities[2] > probabilities[1]);
        assert!(probabilities[1] > probabilities[0]);
        assert!((probabilities.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = FitClassifier::load(&temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(ResumeFitError::ModelNotFound(_))));
    }

    #[test]
    fn test_rejects_wrong_classes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("classifier.json");
        classifier().save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap().replace("Good Fit", "Great Fit");
        std::fs::write(&path, content).unwrap();

        assert!(matches!(FitClassifier::load(&path), Err(ResumeFitError::ModelError(_))));
    }
}
