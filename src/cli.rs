//! CLI interface for the skill matcher

use crate::config::{OutputFormat, ScoringConfig};
use crate::processing::scorer::ScoringParams;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "skill-matcher")]
#[command(about = "Semantic skill extraction for CVs and job offers")]
#[command(long_about = "Detect and rank hard skills, soft skills and tools in free text, job offers and CVs using static sentence embeddings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Boost strength for near-exact matches
    #[arg(short, long, global = true)]
    pub alpha: Option<f32>,

    /// Candidate skills kept per sentence
    #[arg(short = 'k', long, global = true)]
    pub top_k: Option<usize>,

    /// Per-sentence similarity floor
    #[arg(short, long, global = true)]
    pub threshold: Option<f32>,

    /// Output format: console, json, markdown
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Save output to file
    #[arg(short, long, global = true)]
    pub save: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank the skills found in a single text
    AnalyzeText {
        /// Text to analyze
        #[arg(conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// Read the text from a file (TXT, MD)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Per-category skill ranking of a job offer
    AnalyzeOffer {
        /// Path to the job offer (JSON)
        offer: PathBuf,

        /// Keep at most N skills per category
        #[arg(short, long)]
        max_results: Option<usize>,
    },

    /// Per-category skill ranking summed over several texts
    AnalyzeTexts {
        /// Paths to text files (TXT, MD)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Keep at most N skills per category
        #[arg(short, long)]
        max_results: Option<usize>,
    },

    /// Add detected skills to the technologies of every CV summary
    AnalyzeCv {
        /// Path to the CV (JSON)
        cv: PathBuf,

        /// Minimum score for a skill to be added
        #[arg(short, long)]
        min_score: Option<f32>,
    },

    /// Generate a candidate bio tailored to a job offer
    GenerateBio {
        /// Path to the CV (JSON)
        #[arg(long)]
        cv: PathBuf,

        /// Path to the job offer (JSON)
        #[arg(long)]
        offer: PathBuf,

        /// Path to a precomputed skill result (JSON). Computed from the offer when omitted.
        #[arg(long)]
        skills: Option<PathBuf>,

        /// Language of the generated bio
        #[arg(short, long, default_value = "en")]
        language: String,
    },

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download a model
    Download {
        /// Catalogue id, model name or Hugging Face repo id
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show model information
    Info {
        /// Catalogue id, model name or Hugging Face repo id
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "scoring.alpha")
        key: String,

        /// Configuration value
        value: String,
    },
}

impl Cli {
    /// Scoring parameters from the config, with command-line overrides applied.
    pub fn scoring_params(&self, config: &ScoringConfig) -> ScoringParams {
        let mut params = ScoringParams::from(config);
        if let Some(alpha) = self.alpha {
            params.alpha = alpha;
        }
        if let Some(top_k) = self.top_k {
            params.top_k = top_k;
        }
        if let Some(threshold) = self.threshold {
            params.similarity_threshold = threshold;
        }
        params
    }
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_overrides() {
        let cli = Cli::try_parse_from([
            "skill-matcher",
            "analyze-text",
            "Python developer",
            "--alpha",
            "2.5",
            "-k",
            "3",
        ])
        .unwrap();

        let params = cli.scoring_params(&ScoringConfig::default());
        assert_eq!(params.alpha, 2.5);
        assert_eq!(params.top_k, 3);
        assert_eq!(params.similarity_threshold, ScoringConfig::default().similarity_threshold);
        assert!(matches!(cli.command, Commands::AnalyzeText { text: Some(_), file: None }));
    }

    #[test]
    fn test_analyze_text_requires_input() {
        assert!(Cli::try_parse_from(["skill-matcher", "analyze-text"]).is_err());
        assert!(Cli::try_parse_from(["skill-matcher", "analyze-text", "x", "--file", "a.txt"]).is_err());
    }

    #[test]
    fn test_generate_bio_args() {
        let cli = Cli::try_parse_from([
            "skill-matcher",
            "generate-bio",
            "--cv",
            "cv.json",
            "--offer",
            "offer.json",
        ])
        .unwrap();

        match cli.command {
            Commands::GenerateBio { skills, language, .. } => {
                assert!(skills.is_none());
                assert_eq!(language, "en");
            }
            _ => panic!("expected generate-bio"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("json"), Ok(OutputFormat::Json));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("offer.JSON"), &["json"]).is_ok());
        assert!(validate_file_extension(Path::new("offer.pdf"), &["json"]).is_err());
        assert!(validate_file_extension(Path::new("offer"), &["json"]).is_err());
    }
}
