//! Precomputed skill embeddings, built once and read-only afterwards

use crate::error::{Result, SkillMatcherError};
use crate::processing::embeddings::Embedder;
use crate::processing::vocabulary::{SkillCategory, SkillVocabulary};
use log::info;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillEmbeddingEntry {
    pub label: String,
    pub category: SkillCategory,
    pub embedding: Vec<f32>,
}

/// Skill label -> (embedding, category), in vocabulary order.
#[derive(Debug, Clone)]
pub struct SkillEmbeddingIndex {
    entries: Vec<SkillEmbeddingEntry>,
    by_label: HashMap<String, usize>,
    dimension: usize,
}

impl SkillEmbeddingIndex {
    pub fn build(vocabulary: &SkillVocabulary, embedder: &dyn Embedder) -> Result<Self> {
        vocabulary.validate()?;
        let start_time = Instant::now();

        let (labels, categories): (Vec<String>, Vec<SkillCategory>) = vocabulary
            .iter()
            .map(|(label, category)| (label.to_string(), category))
            .unzip();

        let embeddings = embedder.embed_batch(&labels)?;
        if embeddings.len() != labels.len() {
            return Err(SkillMatcherError::Embedding(format!(
                "Expected {} skill embeddings, got {}",
                labels.len(),
                embeddings.len()
            )));
        }

        let dimension = embedder.dimension();
        let mut entries = Vec::with_capacity(labels.len());
        let mut by_label = HashMap::with_capacity(labels.len());

        for ((label, category), embedding) in labels.into_iter().zip(categories).zip(embeddings) {
            if embedding.len() != dimension {
                return Err(SkillMatcherError::Embedding(format!(
                    "Skill '{}' embedded to {} dimensions, expected {}",
                    label,
                    embedding.len(),
                    dimension
                )));
            }
            by_label.insert(label.clone(), entries.len());
            entries.push(SkillEmbeddingEntry {
                label,
                category,
                embedding,
            });
        }

        info!(
            "Built skill index: {} skills, {} dimensions, model {} ({:.2?})",
            entries.len(),
            dimension,
            embedder.model_name(),
            start_time.elapsed()
        );

        Ok(Self {
            entries,
            by_label,
            dimension,
        })
    }

    pub fn lookup(&self, label: &str) -> Option<&SkillEmbeddingEntry> {
        self.by_label.get(label).map(|&i| &self.entries[i])
    }

    pub fn category_of(&self, label: &str) -> Option<SkillCategory> {
        self.lookup(label).map(|entry| entry.category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillEmbeddingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
