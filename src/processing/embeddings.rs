//! Sentence embeddings using Model2Vec

use crate::config::Config;
use crate::error::{Result, ResumeFitError};
use crate::processing::embedding_manager::EmbeddingModelManager;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::time::Instant;

/// Anything that turns texts into fixed-size vectors
pub trait TextEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn model_name(&self) -> &str;

    fn encode_single(&self, text: &str) -> Result<Vec<f32>> {
        self.encode(&[text.to_string()])?
            .pop()
            .ok_or_else(|| ResumeFitError::Embedding("Encoder returned no embedding".to_string()))
    }
}

pub struct EmbeddingEngine {
    model: StaticModel,
    model_name: String,
}

impl EmbeddingEngine {
    /// Load a Model2Vec model from a local directory
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();

        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| e.context(format!("Failed to load model from {}", model_path.display())))?;

        info!("Model loaded successfully in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }

    /// Resolve the configured model, downloading it if needed, then load it
    pub async fn from_config(config: &Config, model_override: Option<&str>) -> Result<Self> {
        let requested = model_override.unwrap_or(&config.models.default_embedding_model);

        let mut manager = EmbeddingModelManager::new(config.get_models_dir()).await?;
        let model_id = manager
            .resolve_model_id(requested)
            .ok_or_else(|| ResumeFitError::ModelNotFound(requested.to_string()))?;
        let model_path = manager.ensure_model_available(&model_id).await?;

        Self::load(&model_path, &model_id)
    }
}

impl TextEncoder for EmbeddingEngine {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn encode_single(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }
}

/// Encode in batches with a progress bar
pub fn encode_with_progress<E: TextEncoder + ?Sized>(
    encoder: &E,
    texts: &[String],
    batch_size: usize,
    message: &str,
) -> Result<Vec<Vec<f32>>> {
    let progress = ProgressBar::new(texts.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .map_err(|e| ResumeFitError::OutputFormatting(e.to_string()))?
            .progress_chars("=> "),
    );
    progress.set_message(message.to_string());

    let mut embeddings = Vec::with_capacity(texts.len());
    for batch in texts.chunks(batch_size.max(1)) {
        let batch_embeddings = encoder.encode(batch)?;
        if batch_embeddings.len() != batch.len() {
            return Err(ResumeFitError::Embedding(format!(
                "Encoder returned {} embeddings for {} texts",
                batch_embeddings.len(),
                batch.len()
            )));
        }
        embeddings.extend(batch_embeddings);
        progress.inc(batch.len() as u64);
    }

    progress.finish_and_clear();
    Ok(embeddings)
}

/// Cosine similarity between two embeddings; 0.0 for zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeFitError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LengthEncoder;

    impl TextEncoder for LengthEncoder {
        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn model_name(&self) -> &str {
            "length"
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(ResumeFitError::Embedding(_))
        ));
    }

    #[test]
    fn test_encode_single_default() {
        let embedding = LengthEncoder.encode_single("abc").unwrap();
        assert_eq!(embedding, vec![3.0, 1.0]);
    }

    #[test]
    fn test_encode_with_progress_keeps_order() {
        let texts: Vec<String> = ["a", "bbb", "cc", "dddd", "e"].iter().map(|s| s.to_string()).collect();
        let embeddings = encode_with_progress(&LengthEncoder, &texts, 2, "test").unwrap();

        let lengths: Vec<f32> = embeddings.iter().map(|e| e[0]).collect();
        assert_eq!(lengths, vec![1.0, 3.0, 2.0, 4.0, 1.0]);
    }
}
