//! Text scoring and skill analysis module

pub mod aggregator;
pub mod analyzer;
pub mod document;
pub mod embedding_manager;
pub mod embeddings;
pub mod scorer;
pub mod skill_index;
pub mod vocabulary;
