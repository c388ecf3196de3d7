//! Skill matcher library
//!
//! Scores free text, job offers and CVs against a fixed skill vocabulary
//! using static sentence embeddings, and ranks the matches per category.

pub mod bio;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, SkillMatcherError};
pub use processing::aggregator::SkillResult;
pub use processing::analyzer::SkillAnalyzer;
pub use processing::embeddings::Embedder;
pub use processing::scorer::{ScoredSkill, ScoringParams};
pub use processing::vocabulary::{SkillCategory, SkillVocabulary};
