//! Similarity and fit-class prediction providers

use crate::classifier::model::FitClassifier;
use crate::config::LabelingConfig;
use crate::error::{Result, ResumeFitError};
use crate::processing::embeddings::{cosine_similarity, TextEncoder};
use crate::processing::reconciler::FitLabel;
use crate::processing::tfidf::TfidfScorer;
use log::{debug, warn};

/// Source of a similarity score and a Poor/Average/Good probability vector
pub trait FitPredictor {
    fn similarity(&self, resume: &str, job: &str) -> Result<f32>;

    fn predict_proba(&self, resume: &str, job: &str) -> Result<[f32; 3]>;

    fn predict_label(&self, resume: &str, job: &str) -> Result<FitLabel> {
        Ok(most_likely(&self.predict_proba(resume, job)?))
    }

    fn describe(&self) -> String;
}

/// Highest-probability label; ties go to the lower label
pub fn most_likely(probabilities: &[f32; 3]) -> FitLabel {
    let mut best = FitLabel::PoorFit;
    for label in FitLabel::ALL {
        if probabilities[label.index()] > probabilities[best.index()] {
            best = label;
        }
    }
    best
}

/// Similarity thresholds used to derive weak labels
#[derive(Debug, Clone, Copy)]
pub struct WeakLabeler {
    good_fit: f32,
    average_fit: f32,
}

impl Default for WeakLabeler {
    fn default() -> Self {
        Self::new(0.70, 0.40)
    }
}

impl WeakLabeler {
    pub fn new(good_fit: f32, average_fit: f32) -> Self {
        Self { good_fit, average_fit }
    }

    pub fn from_config(config: &LabelingConfig) -> Self {
        Self::new(config.good_fit_similarity, config.average_fit_similarity)
    }

    pub fn label(&self, similarity: f32) -> FitLabel {
        if similarity >= self.good_fit {
            FitLabel::GoodFit
        } else if similarity >= self.average_fit {
            FitLabel::AverageFit
        } else {
            FitLabel::PoorFit
        }
    }
}

/// Embedding cosine similarity plus a trained classifier over the pair embedding
pub struct EmbeddingPredictor<E: TextEncoder> {
    encoder: E,
    classifier: FitClassifier,
}

impl<E: TextEncoder> EmbeddingPredictor<E> {
    pub fn new(encoder: E, classifier: FitClassifier) -> Self {
        if classifier.embedding_model() != encoder.model_name() {
            warn!(
                "Classifier was trained on '{}' but the loaded embedding model is '{}'",
                classifier.embedding_model(),
                encoder.model_name()
            );
        }
        Self { encoder, classifier }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }
}

impl<E: TextEncoder> FitPredictor for EmbeddingPredictor<E> {
    fn similarity(&self, resume: &str, job: &str) -> Result<f32> {
        let embeddings = self.encoder.encode(&[resume.to_string(), job.to_string()])?;
        match embeddings.as_slice() {
            [resume_embedding, job_embedding] => cosine_similarity(resume_embedding, job_embedding),
            _ => Err(ResumeFitError::Prediction(format!(
                "Expected 2 embeddings, got {}",
                embeddings.len()
            ))),
        }
    }

    fn predict_proba(&self, resume: &str, job: &str) -> Result<[f32; 3]> {
        let features = self.encoder.encode_single(&format!("{} {}", resume, job))?;
        let probabilities = self.classifier.predict_proba(&features)?;
        debug!("Classifier probabilities: {:?}", probabilities);
        Ok(probabilities)
    }

    fn describe(&self) -> String {
        format!("{} embeddings + logistic regression", self.encoder.model_name())
    }
}

/// TF-IDF similarity labelled with the weak-label thresholds
pub struct LexicalPredictor {
    scorer: TfidfScorer,
    labeler: WeakLabeler,
}

impl LexicalPredictor {
    pub fn new(labeler: WeakLabeler) -> Self {
        Self {
            scorer: TfidfScorer::new(),
            labeler,
        }
    }
}

impl FitPredictor for LexicalPredictor {
    fn similarity(&self, resume: &str, job: &str) -> Result<f32> {
        Ok(self.scorer.similarity(resume, job))
    }

    fn predict_proba(&self, resume: &str, job: &str) -> Result<[f32; 3]> {
        let label = self.labeler.label(self.similarity(resume, job)?);
        let mut probabilities = [0.0; 3];
        probabilities[label.index()] = 1.0;
        Ok(probabilities)
    }

    fn describe(&self) -> String {
        "TF-IDF similarity (lexical)".to_string()
    }
}
