//! Embedding model management for downloading and managing Model2Vec models

use crate::error::{Result, ResumeFitError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Catalogue of known models plus the ones already on disk
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ResumeFitError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: Self::catalogue(),
            downloaded_models: HashSet::new(),
        };

        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    fn catalogue() -> BTreeMap<String, EmbeddingModelInfo> {
        let mut models = BTreeMap::new();

        models.insert(
            "potion-base-8M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                description: "Compact Model2Vec embeddings, the default".to_string(),
                dimensions: 256,
            },
        );

        models.insert(
            "potion-retrieval-32M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Retrieval 32M".to_string(),
                repo_id: "minishlab/potion-retrieval-32M".to_string(),
                size_mb: 130,
                description: "Larger Model2Vec model tuned for retrieval".to_string(),
                dimensions: 512,
            },
        );

        models.insert(
            "m2v-base".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                description: "Legacy Model2Vec base embeddings model".to_string(),
                dimensions: 256,
            },
        );

        models
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            ResumeFitError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && Self::is_valid_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    /// A Model2Vec directory needs a tokenizer, weights and config
    async fn is_valid_model_directory(path: &Path) -> bool {
        for file in ["tokenizer.json", "model.safetensors", "config.json"] {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download a model from the Hugging Face Hub into the models directory
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_info = self
            .available_models
            .get(model_id)
            .ok_or_else(|| ResumeFitError::ModelNotFound(model_id.to_string()))?
            .clone();

        let model_dir = self.models_dir.join(model_id);

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );

        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| ResumeFitError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.repo(hf_hub::Repo::model(model_info.repo_id.clone()));

        for file in ["model.safetensors", "tokenizer.json", "config.json", "README.md"] {
            match repo.get(file).await {
                Ok(file_path) => {
                    fs::copy(&file_path, model_dir.join(file)).await.map_err(|e| {
                        ResumeFitError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("Downloaded {}", file);
                }
                Err(e) if file == "README.md" => {
                    warn!("Optional file {} not found: {}", file, e);
                }
                Err(e) => {
                    return Err(ResumeFitError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded_models.insert(model_id.to_string());
        Ok(model_dir)
    }

    /// Remove a downloaded model directory
    pub async fn remove_model(&mut self, model_id: &str) -> Result<PathBuf> {
        if !self.downloaded_models.contains(model_id) {
            return Err(ResumeFitError::ModelNotFound(model_id.to_string()));
        }

        let model_dir = self.models_dir.join(model_id);
        fs::remove_dir_all(&model_dir).await.map_err(|e| {
            ResumeFitError::ModelError(format!("Failed to remove model: {}", e))
        })?;
        self.downloaded_models.remove(model_id);

        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        if self.downloaded_models.contains(model_id) {
            Some(self.models_dir.join(model_id))
        } else {
            None
        }
    }

    /// Get or download a model, returning its path
    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        if let Some(path) = self.get_model_path(model_id) {
            return Ok(path);
        }

        self.download_model(model_id).await
    }

    /// Models sorted by id
    pub fn list_available_models(&self) -> Vec<(&String, &EmbeddingModelInfo)> {
        self.available_models.iter().collect()
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.downloaded_models.iter().cloned().collect();
        models.sort();
        models
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.available_models.get(model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Resolve a model id from an id, repo id or display name.
    ///
    /// Directories already on disk resolve to themselves so locally copied
    /// models can be used without a catalogue entry.
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) || self.downloaded_models.contains(input) {
            return Some(input.to_string());
        }

        if let Some((id, _)) = self.available_models.iter().find(|(_, info)| info.repo_id == input) {
            return Some(id.clone());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|(_, info)| info.name.to_lowercase() == input_lower)
            .map(|(id, _)| id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_manager_creation() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert!(!manager.list_available_models().is_empty());
        assert!(manager.list_downloaded_models().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert_eq!(manager.resolve_model_id("potion-base-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("potion base 8m"), Some("potion-base-8M".to_string()));
        assert_eq!(manager.resolve_model_id("no-such-model"), None);
    }

    #[tokio::test]
    async fn test_scan_detects_local_models() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("my-model");
        std::fs::create_dir_all(&local).unwrap();
        for file in ["tokenizer.json", "model.safetensors", "config.json"] {
            std::fs::write(local.join(file), "{}").unwrap();
        }
        std::fs::create_dir_all(temp_dir.path().join("incomplete")).unwrap();

        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert!(manager.is_model_downloaded("my-model"));
        assert!(!manager.is_model_downloaded("incomplete"));
        assert_eq!(manager.resolve_model_id("my-model"), Some("my-model".to_string()));
        assert_eq!(manager.get_model_path("my-model"), Some(local));
    }

    #[tokio::test]
    async fn test_remove_model() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("my-model");
        std::fs::create_dir_all(&local).unwrap();
        for file in ["tokenizer.json", "model.safetensors", "config.json"] {
            std::fs::write(local.join(file), "{}").unwrap();
        }

        let mut manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        manager.remove_model("my-model").await.unwrap();

        assert!(!local.exists());
        assert!(!manager.is_model_downloaded("my-model"));
        assert!(manager.remove_model("my-model").await.is_err());
    }
}
