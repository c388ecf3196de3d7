//! Report structures handed to the output formatters

use crate::processing::aggregator::SkillResult;
use crate::processing::document::UserCv;
use crate::processing::scorer::{ScoredSkill, ScoringParams};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportBody {
    /// Per-category ranking of a document or a set of texts.
    Skills(SkillResult),
    /// Ranked skills of a single text.
    Ranked(Vec<ScoredSkill>),
    /// CV with detected skills merged into its summaries.
    Cv(Box<UserCv>),
    Bio(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub title: String,
    /// Input the report was computed from, usually a file path.
    pub source: Option<String>,
    pub model_name: Option<String>,
    pub params: Option<ScoringParams>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub body: ReportBody,
}

impl AnalysisReport {
    pub fn new(title: impl Into<String>, body: ReportBody) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                title: title.into(),
                source: None,
                model_name: None,
                params: None,
            },
            body,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.metadata.model_name = Some(model_name.into());
        self
    }

    pub fn with_params(mut self, params: ScoringParams) -> Self {
        self.metadata.params = Some(params);
        self
    }
}
