//! Sentence embeddings using Model2Vec

use crate::config::Config;
use crate::error::{Result, SkillMatcherError};
use crate::processing::embedding_manager::EmbeddingModelManager;
use anyhow::Context;
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

/// Maps text to a fixed-length dense vector.
///
/// Implementations must be deterministic for a fixed model and safe to share
/// across threads; the scoring engine only ever reads from them.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode several texts at once. Output order matches input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Process-wide engine. The load outcome is memoised, failures included.
static SHARED_ENGINE: OnceCell<std::result::Result<Arc<EmbeddingEngine>, String>> =
    OnceCell::const_new();

pub struct EmbeddingEngine {
    model: StaticModel,
    model_name: String,
    dimension: usize,
}

impl EmbeddingEngine {
    pub fn new(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();

        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;

        let dimension = model.encode_single("dimension probe").len();
        if dimension == 0 {
            return Err(SkillMatcherError::ModelLoading(format!(
                "Model {} produced empty embeddings",
                model_name
            )));
        }

        info!(
            "Model {} loaded in {:.2?} ({} dimensions)",
            model_name,
            start_time.elapsed(),
            dimension
        );

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimension,
        })
    }

    /// Load the model named in the config, downloading it when missing.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let model_path = Self::resolve_model_path(config).await?;
        let model_name = config.models.embedding_model.clone();
        tokio::task::spawn_blocking(move || Self::new(&model_path, &model_name))
            .await
            .map_err(|e| SkillMatcherError::ModelLoading(format!("Model loader panicked: {}", e)))?
    }

    /// Process-wide engine, initialised once on first use.
    ///
    /// Concurrent first callers wait for the single load. The config of the
    /// first caller wins. A failed load is returned to every later caller
    /// without another attempt.
    pub async fn shared(config: &Config) -> Result<Arc<EmbeddingEngine>> {
        let outcome = SHARED_ENGINE
            .get_or_init(|| async {
                Self::from_config(config)
                    .await
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            })
            .await;

        outcome
            .clone()
            .map_err(SkillMatcherError::ModelLoading)
    }

    async fn resolve_model_path(config: &Config) -> Result<PathBuf> {
        let requested = &config.models.embedding_model;

        let direct = PathBuf::from(requested);
        if direct.is_dir() {
            return Ok(direct);
        }

        let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
        let model_id = manager.resolve_model_id(requested).ok_or_else(|| {
            SkillMatcherError::ModelNotFound(format!("Unknown embedding model: {}", requested))
        })?;

        manager
            .ensure_model_available(&model_id)
            .await
            .map_err(|e| SkillMatcherError::ModelLoading(e.to_string()))
    }
}

impl Embedder for EmbeddingEngine {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let start_time = Instant::now();
        let embeddings = self.model.encode(texts);
        debug!("Encoded {} texts in {:.2?}", texts.len(), start_time.elapsed());

        if embeddings.len() != texts.len() {
            return Err(SkillMatcherError::Embedding(format!(
                "Expected {} embeddings, model returned {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity between two embeddings.
///
/// Zero-norm vectors compare as 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SkillMatcherError::Embedding(format!(
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
