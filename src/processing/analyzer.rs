//! Skill analyzer combining the scoring engine, the skill index and aggregation

use crate::config::Config;
use crate::error::{Result, SkillMatcherError};
use crate::processing::aggregator::{categorize, sum_scores, SkillResult};
use crate::processing::document::{DocumentSections, JobOffer, UserCv};
use crate::processing::embeddings::{Embedder, EmbeddingEngine};
use crate::processing::scorer::{ScoredSkill, ScoringEngine, ScoringParams, SkillScores};
use crate::processing::skill_index::SkillEmbeddingIndex;
use crate::processing::vocabulary::SkillVocabulary;
use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

/// Entry point for text, document and CV analysis.
///
/// Cheap to clone; clones share the embedder and the skill index.
#[derive(Clone)]
pub struct SkillAnalyzer {
    engine: ScoringEngine,
}

#[derive(Debug, Clone)]
pub struct AnalyzerStats {
    pub skill_count: usize,
    pub embedding_dimension: usize,
    pub model_name: String,
}

impl SkillAnalyzer {
    /// Build the skill index for `vocabulary` with the given embedder.
    pub fn new(embedder: Arc<dyn Embedder>, vocabulary: &SkillVocabulary) -> Result<Self> {
        let index = SkillEmbeddingIndex::build(vocabulary, embedder.as_ref())?;
        Ok(Self {
            engine: ScoringEngine::new(embedder, Arc::new(index)),
        })
    }

    /// Analyzer over the process-wide embedding engine and configured vocabulary.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let vocabulary = match &config.vocabulary.path {
            Some(path) => {
                info!("Loading skill vocabulary from {}", path.display());
                SkillVocabulary::from_file(path)?
            }
            None => SkillVocabulary::default(),
        };

        let embedder: Arc<dyn Embedder> = EmbeddingEngine::shared(config).await?;
        tokio::task::spawn_blocking(move || Self::new(embedder, &vocabulary))
            .await
            .map_err(|e| SkillMatcherError::AnalysisFailed(format!("Skill index build panicked: {}", e)))?
    }

    pub fn index(&self) -> &SkillEmbeddingIndex {
        self.engine.index()
    }

    /// Raw per-skill totals for one text.
    pub fn score_text(&self, text: &str, params: &ScoringParams) -> Result<SkillScores> {
        self.engine.score_text(text, params)
    }

    /// Ranked skills for one text, across all categories.
    pub fn analyze_text(&self, text: &str, params: &ScoringParams) -> Result<Vec<ScoredSkill>> {
        Ok(self.engine.score_text(text, params)?.into_ranked())
    }

    /// Score each text independently and sum per skill.
    pub fn analyze_texts<S: AsRef<str>>(
        &self,
        texts: &[S],
        params: &ScoringParams,
        max_results_per_category: Option<usize>,
    ) -> Result<SkillResult> {
        let per_text = texts
            .iter()
            .map(|text| self.engine.score_text(text.as_ref(), params))
            .collect::<Result<Vec<_>>>()?;

        debug!("Aggregating skill scores over {} texts", per_text.len());
        let combined = sum_scores(&per_text);
        Ok(categorize(self.index(), &combined, max_results_per_category))
    }

    /// Score a whole document as one sentence stream. Missing sections are skipped.
    pub fn analyze_document(
        &self,
        sections: &DocumentSections,
        params: &ScoringParams,
        max_results_per_category: Option<usize>,
    ) -> Result<SkillResult> {
        let texts: Vec<String> = sections
            .iter()
            .filter_map(|(_, content)| content.as_ref().map(|c| c.to_text()))
            .collect();

        debug!("Scoring document with {} sections", texts.len());
        let scores = self.engine.score_stream(texts.iter().map(String::as_str), params)?;
        Ok(categorize(self.index(), &scores, max_results_per_category))
    }

    pub fn analyze_job_offer(
        &self,
        offer: &JobOffer,
        params: &ScoringParams,
        max_results_per_category: Option<usize>,
    ) -> Result<SkillResult> {
        self.analyze_document(&offer.sections(), params, max_results_per_category)
    }

    /// Return a copy of `cv` whose summaries list the detected skills.
    ///
    /// Skills scoring at least `min_score` are appended to each summary's
    /// technologies, best first, skipping ones already listed.
    pub fn analyze_cv(&self, cv: &UserCv, params: &ScoringParams, min_score: f32) -> Result<UserCv> {
        let mut annotated = cv.clone();

        for summary in annotated.summaries_mut() {
            let Some(text) = summary.text.as_deref().filter(|t| !t.trim().is_empty()) else {
                continue;
            };

            let detected: Vec<String> = self
                .analyze_text(text, params)?
                .into_iter()
                .filter(|skill| skill.score >= min_score)
                .map(|skill| skill.label)
                .collect();

            if detected.is_empty() {
                continue;
            }

            let technologies = summary.technologies.get_or_insert_with(Vec::new);
            let mut existing: HashSet<String> = technologies.iter().cloned().collect();
            for label in detected {
                if existing.insert(label.clone()) {
                    technologies.push(label);
                }
            }
        }

        Ok(annotated)
    }

    pub fn stats(&self) -> AnalyzerStats {
        AnalyzerStats {
            skill_count: self.index().len(),
            embedding_dimension: self.index().dimension(),
            model_name: self.engine.embedder().model_name().to_string(),
        }
    }
}
