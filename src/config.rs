//! Configuration management for the skill matcher

use crate::error::{Result, SkillMatcherError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    pub bio: BioConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Catalogue id, Hugging Face repo id, or a local model directory.
    pub embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Boost strength applied to near-exact matches.
    pub alpha: f32,
    /// Candidate skills kept per sentence.
    pub top_k: usize,
    /// Per-sentence similarity floor.
    pub similarity_threshold: f32,
    /// Inclusion floor for CV technologies.
    pub min_score: f32,
    pub max_results_per_category: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// TOML or JSON vocabulary file. The built-in vocabulary is used when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub prompt_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            top_k: 5,
            similarity_threshold: 0.0,
            min_score: 0.1,
            max_results_per_category: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skill-matcher")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                embedding_model: "potion-base-8M".to_string(),
            },
            scoring: ScoringConfig::default(),
            vocabulary: VocabularyConfig::default(),
            bio: BioConfig {
                endpoint: "http://localhost:11434/api/generate".to_string(),
                model: "gemma3:4b".to_string(),
                timeout_secs: 300,
                prompt_path: None,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load the config from the default location, writing defaults on first use.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| SkillMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-matcher")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    /// Update a single dotted key, e.g. `scoring.alpha`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value.parse::<T>().map_err(|_| {
                SkillMatcherError::Configuration(format!("Invalid value for {}: {}", key, value))
            })
        }

        match key {
            "models.models_dir" => self.models.models_dir = PathBuf::from(value),
            "models.embedding_model" => self.models.embedding_model = value.to_string(),
            "scoring.alpha" => self.scoring.alpha = parse(key, value)?,
            "scoring.top_k" => self.scoring.top_k = parse(key, value)?,
            "scoring.similarity_threshold" => self.scoring.similarity_threshold = parse(key, value)?,
            "scoring.min_score" => self.scoring.min_score = parse(key, value)?,
            "scoring.max_results_per_category" => {
                self.scoring.max_results_per_category = match value {
                    "" | "none" => None,
                    v => Some(parse(key, v)?),
                }
            }
            "vocabulary.path" => {
                self.vocabulary.path = (!value.is_empty()).then(|| PathBuf::from(value))
            }
            "bio.endpoint" => self.bio.endpoint = value.to_string(),
            "bio.model" => self.bio.model = value.to_string(),
            "bio.timeout_secs" => self.bio.timeout_secs = parse(key, value)?,
            "bio.prompt_path" => {
                self.bio.prompt_path = (!value.is_empty()).then(|| PathBuf::from(value))
            }
            "output.color_output" => self.output.color_output = parse(key, value)?,
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value)
                    .map_err(SkillMatcherError::Configuration)?
            }
            _ => {
                return Err(SkillMatcherError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}
