//! Weak-label training of the fit classifier

use crate::classifier::dataset::{build_pairs, stratified_split, ResumeRecord, TrainingPair};
use crate::classifier::logistic::{LogisticOptions, LogisticRegression, NUM_CLASSES};
use crate::classifier::metrics::ClassificationReport;
use crate::classifier::model::{FitClassifier, TrainingMetadata};
use crate::config::TrainingConfig;
use crate::error::{Result, ResumeFitError};
use crate::processing::embeddings::{cosine_similarity, encode_with_progress, TextEncoder};
use crate::processing::predictor::WeakLabeler;
use crate::processing::reconciler::FitLabel;
use chrono::Utc;
use log::info;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct TrainingOutcome {
    pub classifier: FitClassifier,
    pub report: ClassificationReport,
    pub class_distribution: [usize; NUM_CLASSES],
    pub pair_count: usize,
}

pub struct Trainer<'a, E: TextEncoder + ?Sized> {
    encoder: &'a E,
    labeler: WeakLabeler,
    config: TrainingConfig,
    batch_size: usize,
}

impl<'a, E: TextEncoder + ?Sized> Trainer<'a, E> {
    pub fn new(encoder: &'a E, labeler: WeakLabeler, config: TrainingConfig, batch_size: usize) -> Self {
        Self {
            encoder,
            labeler,
            config,
            batch_size,
        }
    }

    pub fn train(&self, records: &[ResumeRecord]) -> Result<TrainingOutcome> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let pairs = build_pairs(records, self.config.negative_fraction, &mut rng);
        if pairs.len() < 2 {
            return Err(ResumeFitError::Training(format!(
                "Need at least 2 training pairs, got {}",
                pairs.len()
            )));
        }
        info!("Built {} training pairs from {} resumes", pairs.len(), records.len());

        let labels = self.weak_labels(&pairs)?;

        let mut class_distribution = [0usize; NUM_CLASSES];
        for &label in &labels {
            class_distribution[label] += 1;
        }
        for label in FitLabel::ALL {
            info!("Class distribution: {} = {}", label, class_distribution[label.index()]);
        }

        let features = self.pair_features(&pairs)?;
        let (train_idx, test_idx) = stratified_split(&labels, self.config.test_fraction, &mut rng);
        info!("Train/test split: {} / {}", train_idx.len(), test_idx.len());

        let (x_train, y_train) = select_rows(&features, &labels, &train_idx);
        let (x_test, y_test) = select_rows(&features, &labels, &test_idx);

        let options = LogisticOptions {
            max_iter: self.config.max_iter,
            learning_rate: self.config.learning_rate,
            l2_penalty: self.config.l2_penalty,
            balanced_class_weights: self.config.balanced_class_weights,
            ..LogisticOptions::default()
        };
        let model = LogisticRegression::fit(&x_train, &y_train, &options)?;

        let y_pred = if y_test.is_empty() { Vec::new() } else { model.predict(&x_test) };
        let report = ClassificationReport::new(&y_test, &y_pred);
        info!("Test accuracy: {:.3}", report.accuracy);

        let metadata = TrainingMetadata {
            trained_at: Utc::now(),
            training_samples: y_train.len(),
            test_samples: y_test.len(),
            class_distribution,
            test_accuracy: report.accuracy,
        };

        Ok(TrainingOutcome {
            classifier: FitClassifier::new(model, self.encoder.model_name().to_string(), metadata),
            report,
            class_distribution,
            pair_count: pairs.len(),
        })
    }

    /// Label each pair from the cosine similarity of its two texts
    fn weak_labels(&self, pairs: &[TrainingPair]) -> Result<Vec<usize>> {
        let resumes: Vec<String> = pairs.iter().map(|p| p.resume.clone()).collect();
        let jobs: Vec<String> = pairs.iter().map(|p| p.job.clone()).collect();

        let resume_embeddings = encode_with_progress(self.encoder, &resumes, self.batch_size, "Encoding resumes")?;
        let job_embeddings = encode_with_progress(self.encoder, &jobs, self.batch_size, "Encoding job texts")?;

        resume_embeddings
            .iter()
            .zip(job_embeddings.iter())
            .map(|(r, j)| -> Result<usize> { Ok(self.labeler.label(cosine_similarity(r, j)?).index()) })
            .collect()
    }

    fn pair_features(&self, pairs: &[TrainingPair]) -> Result<Array2<f64>> {
        let texts: Vec<String> = pairs.iter().map(|p| p.combined_text()).collect();
        let embeddings = encode_with_progress(self.encoder, &texts, self.batch_size, "Encoding pairs")?;

        let dimension = embeddings.first().map(|e| e.len()).unwrap_or(0);
        if dimension == 0 || embeddings.iter().any(|e| e.len() != dimension) {
            return Err(ResumeFitError::Training(
                "Encoder produced empty or inconsistent embeddings".to_string(),
            ));
        }

        let flat: Vec<f64> = embeddings.into_iter().flatten().map(|v| v as f64).collect();
        Array2::from_shape_vec((pairs.len(), dimension), flat)
            .map_err(|e| ResumeFitError::Training(format!("Failed to build feature matrix: {}", e)))
    }
}

fn select_rows(features: &Array2<f64>, labels: &[usize], indices: &[usize]) -> (Array2<f64>, Vec<usize>) {
    let x = features.select(ndarray::Axis(0), indices);
    let y = indices.iter().map(|&i| labels[i]).collect();
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    /// Bag of category words, enough to make same-category pairs look alike
    struct TopicEncoder;

    impl TextEncoder for TopicEncoder {
        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let topics = ["python", "recruiting", "welding"];
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    topics.iter().map(|topic| lower.matches(topic).count() as f32).collect()
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "topic"
        }
    }

    fn records() -> Vec<ResumeRecord> {
        let mut records = Vec::new();
        for (category, topic) in [("Data", "python"), ("HR", "recruiting"), ("Trades", "welding")] {
            for i in 0..6 {
                records.push(ResumeRecord {
                    resume: format!("{} {} resume number {}", topic, topic, i),
                    category: category.to_string(),
                });
            }
        }
        records
    }

    #[test]
    fn test_training_produces_classifier() {
        let config = Config::default();
        let trainer = Trainer::new(&TopicEncoder, WeakLabeler::default(), config.training.clone(), 4);

        let outcome = trainer.train(&records()).unwrap();

        // 18 same-category pairs plus round(18 * 0.6) cross-category pairs
        assert_eq!(outcome.pair_count, 29);
        assert_eq!(outcome.class_distribution[FitLabel::GoodFit.index()], 18);
        assert_eq!(outcome.class_distribution[FitLabel::PoorFit.index()], 11);
        assert_eq!(outcome.class_distribution.iter().sum::<usize>(), 29);

        assert_eq!(outcome.classifier.embedding_model(), "topic");
        assert_eq!(outcome.classifier.n_features(), 3);
        let metadata = outcome.classifier.metadata();
        assert_eq!(metadata.training_samples + metadata.test_samples, 29);
        assert_eq!(outcome.report.support(), metadata.test_samples);
    }

    #[test]
    fn test_training_rejects_tiny_dataset() {
        let config = Config::default();
        let trainer = Trainer::new(&TopicEncoder, WeakLabeler::default(), config.training.clone(), 4);
        let records = vec![ResumeRecord {
            resume: "python".to_string(),
            category: "Data".to_string(),
        }];

        assert!(matches!(trainer.train(&records), Err(ResumeFitError::Training(_))));
    }
}
