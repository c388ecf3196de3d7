//! Local catalogue of Model2Vec embedding models: lookup, detection and download

use crate::error::{Result, SkillMatcherError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files `StaticModel::from_pretrained` needs in a local model directory.
const REQUIRED_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];
const OPTIONAL_FILES: [&str; 1] = ["README.md"];

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Manager for embedding models - handles download, caching, and selection
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                SkillMatcherError::Configuration(format!(
                    "Failed to create models directory {}: {}",
                    models_dir.display(),
                    e
                ))
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
        let entries = [
            (
                "potion-base-8M",
                "Potion Base 8M",
                "minishlab/potion-base-8M",
                33,
                256,
                "General-purpose static sentence embeddings, small and fast",
            ),
            (
                "potion-base-32M",
                "Potion Base 32M",
                "minishlab/potion-base-32M",
                130,
                512,
                "Higher quality general-purpose static sentence embeddings",
            ),
            (
                "potion-multilingual-128M",
                "Potion Multilingual 128M",
                "minishlab/potion-multilingual-128M",
                500,
                256,
                "Multilingual static embeddings for non-English CVs and offers",
            ),
            (
                "m2v-base",
                "Model2Vec Base",
                "minishlab/M2V_base_output",
                90,
                256,
                "Legacy Model2Vec base embeddings model",
            ),
        ];

        entries
            .into_iter()
            .map(|(id, name, repo_id, size_mb, dimensions, description)| {
                (
                    id.to_string(),
                    EmbeddingModelInfo {
                        name: name.to_string(),
                        repo_id: repo_id.to_string(),
                        size_mb,
                        description: description.to_string(),
                        dimensions,
                    },
                )
            })
            .collect()
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if Self::is_valid_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_valid_model_directory(path: &Path) -> bool {
        for file in REQUIRED_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download a catalogued model from the Hugging Face Hub.
    pub async fn download_model(&mut self, model_id: &str, force: bool) -> Result<PathBuf> {
        let model_info = self
            .available_models
            .get(model_id)
            .ok_or_else(|| SkillMatcherError::ModelNotFound(format!("Unknown embedding model: {}", model_id)))?
            .clone();

        let model_dir = self.models_dir.join(model_id);
        if self.downloaded_models.contains(model_id) && !force {
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );

        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| SkillMatcherError::ModelLoading(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model_info.repo_id.clone());

        for file in REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                SkillMatcherError::ModelLoading(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await?;
            info!("  downloaded {}", file);
        }

        for file in OPTIONAL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                }
                Err(e) => warn!("Optional file {} not available: {}", file, e),
            }
        }

        self.downloaded_models.insert(model_id.to_string());
        info!("Embedding model {} is ready", model_info.name);
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    /// Get or download a model, returning its directory
    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        if let Some(path) = self.get_model_path(model_id) {
            return Ok(path);
        }
        self.download_model(model_id, false).await
    }

    pub fn list_available_models(&self) -> Vec<(&str, &EmbeddingModelInfo)> {
        self.available_models
            .iter()
            .map(|(id, info)| (id.as_str(), info))
            .collect()
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.available_models.get(model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Resolve model ID from a catalogue id, repo id, or display name.
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|(_, info)| info.repo_id == input || info.name.to_lowercase() == input_lower)
            .map(|(id, _)| id.clone())
    }
}
