//! Error handling for the skill matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The embedding model could not be initialised. Never retried.
    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Invalid skill vocabulary: {0}")]
    Vocabulary(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Bio generation timed out: {0}")]
    BioTimeout(String),

    #[error("Could not connect to bio generation service: {0}")]
    BioConnection(String),

    #[error("Error generating bio: {0}")]
    BioGeneration(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

impl SkillMatcherError {
    /// Errors that leave the process unable to score anything.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SkillMatcherError::ModelLoading(_) | SkillMatcherError::ModelNotFound(_)
        )
    }

    /// HTTP-style status an outer transport layer should report.
    pub fn status_code(&self) -> u16 {
        match self {
            SkillMatcherError::InvalidInput(_) | SkillMatcherError::Vocabulary(_) => 400,
            SkillMatcherError::BioConnection(_) => 503,
            SkillMatcherError::BioTimeout(_) => 504,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillMatcherError>;

/// The embedding backend reports model load failures as anyhow errors.
impl From<anyhow::Error> for SkillMatcherError {
    fn from(err: anyhow::Error) -> Self {
        SkillMatcherError::ModelLoading(format!("{:#}", err))
    }
}

impl From<toml::de::Error> for SkillMatcherError {
    fn from(err: toml::de::Error) -> Self {
        SkillMatcherError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio_errors_map_to_distinct_statuses() {
        assert_eq!(SkillMatcherError::BioTimeout("slow".into()).status_code(), 504);
        assert_eq!(SkillMatcherError::BioConnection("down".into()).status_code(), 503);
        assert_eq!(SkillMatcherError::BioGeneration("empty".into()).status_code(), 500);
    }

    #[test]
    fn test_only_model_errors_are_fatal() {
        assert!(SkillMatcherError::ModelLoading("no weights".into()).is_fatal());
        assert!(!SkillMatcherError::InvalidInput("top_k".into()).is_fatal());
        assert!(!SkillMatcherError::Embedding("dims".into()).is_fatal());
    }

    #[test]
    fn test_backend_errors_keep_their_context() {
        use anyhow::Context;

        let backend: anyhow::Result<()> = Err(anyhow::anyhow!("missing tokenizer.json"));
        let err: SkillMatcherError = backend.context("Failed to load model").unwrap_err().into();

        assert!(matches!(err, SkillMatcherError::ModelLoading(_)));
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Model loading error: Failed to load model: missing tokenizer.json"
        );
    }
}
