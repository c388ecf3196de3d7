//! Deterministic embedders shared by the integration tests

#![allow(dead_code)]

use skill_matcher::{Embedder, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns fixed vectors for known texts and a shared "unrelated" vector otherwise.
pub struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    dimension: usize,
    calls: AtomicUsize,
}

impl TableEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            table: HashMap::new(),
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dimension);
        self.table.insert(text.to_string(), vector);
        self
    }

    /// Unit vector on `axis`.
    pub fn axis(&self, axis: usize) -> Vec<f32> {
        let mut v = vec![0.0; self.dimension];
        v[axis] = 1.0;
        v
    }

    /// Unit vector whose cosine with `axis` is `similarity`; the rest lies on the last axis.
    pub fn toward(&self, axis: usize, similarity: f32) -> Vec<f32> {
        let mut v = vec![0.0; self.dimension];
        v[axis] = similarity;
        v[self.dimension - 1] = (1.0 - similarity * similarity).sqrt();
        v
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for TableEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.axis(self.dimension - 1)))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "table"
    }
}

/// One axis per keyword: a text points at every keyword it mentions.
pub struct KeywordEmbedder {
    keywords: Vec<String>,
}

impl KeywordEmbedder {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        let mut v = vec![0.0; self.keywords.len() + 1];
        for (i, keyword) in self.keywords.iter().enumerate() {
            if lower.contains(keyword.as_str()) {
                v[i] = 1.0;
            }
        }
        if v.iter().all(|x| *x == 0.0) {
            v[self.keywords.len()] = 1.0;
        }
        Ok(v)
    }

    fn dimension(&self) -> usize {
        self.keywords.len() + 1
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}
