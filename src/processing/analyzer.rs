//! Fit analysis engine combining prediction, skill coverage and reconciliation

use crate::classifier::model::FitClassifier;
use crate::config::Config;
use crate::error::Result;
use crate::processing::embeddings::EmbeddingEngine;
use crate::processing::explanation::{explain_match, MatchExplanation};
use crate::processing::predictor::{most_likely, EmbeddingPredictor, FitPredictor, LexicalPredictor, WeakLabeler};
use crate::processing::reconciler::{FitLabel, FitReconciler, Reconciliation};
use crate::processing::skills::SkillExtractor;
use crate::processing::tfidf::TfidfScorer;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything known about one resume/job pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitAssessment {
    /// Provider similarity in [-1, 1] for embeddings, [0, 1] for TF-IDF
    pub similarity: f32,
    /// Poor, Average, Good
    pub probabilities: [f32; 3],
    pub predicted: FitLabel,
    pub reconciliation: Reconciliation,
    pub coverage: f32,
    pub explanation: MatchExplanation,
    pub lexical_match_percentage: f32,
    pub predictor: String,
    pub processing_time_ms: u64,
}

impl FitAssessment {
    pub fn final_label(&self) -> FitLabel {
        self.reconciliation.label
    }

    pub fn coverage_percentage(&self) -> f32 {
        self.coverage * 100.0
    }

    pub fn confidence(&self) -> f32 {
        self.probabilities[self.predicted.index()]
    }
}

pub struct FitAnalyzer {
    extractor: SkillExtractor,
    reconciler: FitReconciler,
    lexical: TfidfScorer,
    predictor: Box<dyn FitPredictor>,
}

impl FitAnalyzer {
    pub fn new(config: &Config, predictor: Box<dyn FitPredictor>) -> Result<Self> {
        Ok(Self {
            extractor: SkillExtractor::new(&config.skills.vocabulary)?,
            reconciler: FitReconciler::new(config.reconciliation.coverage_threshold),
            lexical: TfidfScorer::new(),
            predictor,
        })
    }

    /// Analyzer backed by TF-IDF similarity only
    pub fn lexical(config: &Config) -> Result<Self> {
        let predictor = LexicalPredictor::new(WeakLabeler::from_config(&config.labeling));
        Self::new(config, Box::new(predictor))
    }

    /// Load the embedding model and trained classifier, then build the analyzer
    pub async fn with_embeddings(config: &Config, model_override: Option<&str>) -> Result<Self> {
        let classifier = FitClassifier::load(&config.models.classifier_path)?;
        let model = model_override.unwrap_or_else(|| classifier.embedding_model()).to_string();
        let engine = EmbeddingEngine::from_config(config, Some(&model)).await?;

        info!("Analyzer ready with {} embeddings", model);
        Self::new(config, Box::new(EmbeddingPredictor::new(engine, classifier)))
    }

    /// Embedding analyzer when a classifier has been trained, TF-IDF otherwise.
    ///
    /// Only a missing classifier file selects the lexical fallback. A corrupt
    /// classifier or a model that fails to load is an error.
    pub async fn from_config(config: &Config, model_override: Option<&str>) -> Result<Self> {
        let classifier_path = &config.models.classifier_path;
        if !classifier_path.exists() {
            warn!("No trained classifier at {}", classifier_path.display());
            warn!("Falling back to TF-IDF similarity. Run `resume-fit train` to build a classifier.");
            return Self::lexical(config);
        }

        Self::with_embeddings(config, model_override).await
    }

    /// Keyword overlap only, no model involved
    pub fn explain(&self, resume_text: &str, job_text: &str) -> MatchExplanation {
        explain_match(&self.extractor, resume_text, job_text)
    }

    pub fn analyze(&self, resume_text: &str, job_text: &str) -> Result<FitAssessment> {
        let start_time = Instant::now();

        let explanation = self.explain(resume_text, job_text);
        let coverage = explanation.coverage();
        debug!(
            "Skills: {} matched, {} missing, coverage {:.3}",
            explanation.matched.len(),
            explanation.missing.len(),
            coverage
        );

        let lexical_match_percentage = self.lexical.match_percentage(resume_text, job_text);

        let similarity = self.predictor.similarity(resume_text, job_text)?;
        let probabilities = self.predictor.predict_proba(resume_text, job_text)?;
        let predicted = most_likely(&probabilities);
        debug!("Predicted {} with similarity {:.3}", predicted, similarity);

        let reconciliation = self.reconciler.reconcile(predicted, coverage);
        if reconciliation.is_downgraded() {
            info!("Prediction adjusted: {} -> {}", predicted, reconciliation);
        }

        Ok(FitAssessment {
            similarity,
            probabilities,
            predicted,
            reconciliation,
            coverage,
            explanation,
            lexical_match_percentage,
            predictor: self.predictor.describe(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    pub fn extractor(&self) -> &SkillExtractor {
        &self.extractor
    }

    pub fn reconciler(&self) -> &FitReconciler {
        &self.reconciler
    }
}
