//! Sentence-level skill scoring against the skill embedding index

use crate::config::ScoringConfig;
use crate::error::{Result, SkillMatcherError};
use crate::processing::embeddings::{cosine_similarity, Embedder};
use crate::processing::skill_index::SkillEmbeddingIndex;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Similarity above which a match counts as near-exact and gets boosted.
pub const EXACT_MATCH_THRESHOLD: f32 = 0.95;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSkill {
    #[serde(rename = "name", alias = "label")]
    pub label: String,
    pub score: f32,
}

impl ScoredSkill {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    /// Boost strength for near-exact matches.
    pub alpha: f32,
    /// Candidate skills kept per sentence. Must be at least 1.
    pub top_k: usize,
    /// Skills below this similarity are dropped before top-k selection.
    pub similarity_threshold: f32,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            top_k: 5,
            similarity_threshold: 0.0,
        }
    }
}

impl From<&ScoringConfig> for ScoringParams {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            alpha: config.alpha,
            top_k: config.top_k,
            similarity_threshold: config.similarity_threshold,
        }
    }
}

impl ScoringParams {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(SkillMatcherError::InvalidInput("top_k must be at least 1".to_string()));
        }
        if !self.alpha.is_finite() {
            return Err(SkillMatcherError::InvalidInput(format!("alpha must be finite, got {}", self.alpha)));
        }
        if !self.similarity_threshold.is_finite() {
            return Err(SkillMatcherError::InvalidInput(format!(
                "similarity_threshold must be finite, got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

/// Accumulated per-skill totals, remembering the order skills were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillScores {
    order: Vec<String>,
    totals: HashMap<String, f32>,
}

impl SkillScores {
    pub fn add(&mut self, label: &str, contribution: f32) {
        match self.totals.get_mut(label) {
            Some(total) => *total += contribution,
            None => {
                self.order.push(label.to_string());
                self.totals.insert(label.to_string(), contribution);
            }
        }
    }

    /// Add every total of `other`, keeping this map's first-seen order.
    pub fn merge(&mut self, other: &SkillScores) {
        for (label, score) in other.iter() {
            self.add(label, score);
        }
    }

    pub fn get(&self, label: &str) -> Option<f32> {
        self.totals.get(label).copied()
    }

    /// Totals in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.order
            .iter()
            .map(move |label| (label.as_str(), self.totals[label]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop skills whose total is not strictly positive.
    pub fn retain_positive(mut self) -> Self {
        let totals = &self.totals;
        self.order.retain(|label| totals[label] > 0.0);
        self.totals.retain(|_, total| *total > 0.0);
        self
    }

    /// Descending by score; equal scores keep first-seen order.
    pub fn into_ranked(self) -> Vec<ScoredSkill> {
        let mut ranked: Vec<ScoredSkill> = self
            .iter()
            .map(|(label, score)| ScoredSkill::new(label, score))
            .collect();
        sort_descending(&mut ranked);
        ranked
    }
}

/// Stable descending sort on score.
pub fn sort_descending(skills: &mut [ScoredSkill]) {
    skills.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Split on '.', trim, and drop empty fragments.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turns free text into weighted skill matches.
#[derive(Clone)]
pub struct ScoringEngine {
    embedder: Arc<dyn Embedder>,
    index: Arc<SkillEmbeddingIndex>,
}

impl ScoringEngine {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<SkillEmbeddingIndex>) -> Self {
        Self { embedder, index }
    }

    pub fn index(&self) -> &SkillEmbeddingIndex {
        &self.index
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Score one text. Skills with a non-positive total are omitted.
    ///
    /// Each sentence keeps its `top_k` most similar skills at or above the
    /// threshold. The mean similarity of that selection is the sentence
    /// weight; each selected skill contributes `boosted * weight`, where
    /// similarities above [`EXACT_MATCH_THRESHOLD`] are multiplied by
    /// `1 + alpha`.
    pub fn score_text(&self, text: &str, params: &ScoringParams) -> Result<SkillScores> {
        self.score_stream(std::iter::once(text), params)
    }

    /// Score several texts as one sentence stream.
    ///
    /// Contributions are summed across all texts before non-positive totals
    /// are dropped, so a negative contribution in one text offsets a positive
    /// one in another.
    pub fn score_stream<'a, I>(&self, texts: I, params: &ScoringParams) -> Result<SkillScores>
    where
        I: IntoIterator<Item = &'a str>,
    {
        params.validate()?;

        let mut scores = SkillScores::default();
        for text in texts {
            self.accumulate(text, params, &mut scores)?;
        }
        Ok(scores.retain_positive())
    }

    fn accumulate(&self, text: &str, params: &ScoringParams, scores: &mut SkillScores) -> Result<()> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Ok(());
        }

        let sentence_embeddings = self.embedder.embed_batch(&sentences)?;
        if sentence_embeddings.len() != sentences.len() {
            return Err(SkillMatcherError::Embedding(format!(
                "Expected {} sentence embeddings, got {}",
                sentences.len(),
                sentence_embeddings.len()
            )));
        }

        for (sentence, embedding) in sentences.iter().zip(&sentence_embeddings) {
            let selected = self.top_matches(embedding, params)?;
            if selected.is_empty() {
                debug!("No skill above threshold for sentence: {}", sentence);
                continue;
            }

            let sentence_weight = selected.iter().map(|(_, sim)| sim).sum::<f32>() / selected.len() as f32;

            for &(label, similarity) in &selected {
                let boosted = if similarity > EXACT_MATCH_THRESHOLD {
                    similarity * (1.0 + params.alpha)
                } else {
                    similarity
                };
                scores.add(label, boosted * sentence_weight);
            }
        }

        debug!(
            "Scored {} sentences against {} skills, {} skills matched so far",
            sentences.len(),
            self.index.len(),
            scores.len()
        );
        Ok(())
    }

    /// Labels and similarities of the best skills for one sentence.
    fn top_matches(&self, sentence_embedding: &[f32], params: &ScoringParams) -> Result<Vec<(&str, f32)>> {
        let mut sims = Vec::with_capacity(self.index.len());
        for entry in self.index.iter() {
            let similarity = cosine_similarity(sentence_embedding, &entry.embedding)?;
            if similarity >= params.similarity_threshold {
                sims.push((entry.label.as_str(), similarity));
            }
        }

        // Stable: equal similarities keep vocabulary order.
        sims.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        sims.truncate(params.top_k);
        Ok(sims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::vocabulary::SkillVocabulary;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// Axis-aligned embeddings: a text mentioning a skill points at that
    /// skill's axis; anything else points at the last, unrelated axis.
    struct AxisEmbedder {
        skills: Vec<String>,
        calls: AtomicUsize,
    }

    impl AxisEmbedder {
        fn new(skills: &[&str]) -> Self {
            Self {
                skills: skills.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Embedder for AxisEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            let lower = text.to_lowercase();
            let mut v = vec![0.0; self.skills.len() + 1];
            let mut hit = false;
            for (i, skill) in self.skills.iter().enumerate() {
                if lower.contains(&skill.to_lowercase()) {
                    v[i] = 1.0;
                    hit = true;
                }
            }
            if !hit {
                v[self.skills.len()] = 1.0;
            }
            Ok(v)
        }

        fn dimension(&self) -> usize {
            self.skills.len() + 1
        }

        fn model_name(&self) -> &str {
            "axis"
        }
    }

    fn engine() -> (ScoringEngine, Arc<AxisEmbedder>) {
        let embedder = Arc::new(AxisEmbedder::new(&["Python", "Communication", "Git"]));
        let vocabulary = SkillVocabulary::new(
            vec!["Python".into()],
            vec!["Communication".into()],
            vec!["Git".into()],
        )
        .unwrap();
        let index = SkillEmbeddingIndex::build(&vocabulary, embedder.as_ref()).unwrap();
        (ScoringEngine::new(embedder.clone(), Arc::new(index)), embedder)
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("I used Python.  . Then Git. "),
            vec!["I used Python".to_string(), "Then Git".to_string()]
        );
        assert!(split_sentences(" ... ").is_empty());
    }

    #[test]
    fn test_blank_text_never_calls_embedder() {
        let (engine, embedder) = engine();
        let before = embedder.calls.load(AtomicOrdering::SeqCst);

        assert!(engine.score_text("", &ScoringParams::default()).unwrap().is_empty());
        assert!(engine.score_text("   ", &ScoringParams::default()).unwrap().is_empty());

        assert_eq!(embedder.calls.load(AtomicOrdering::SeqCst), before);
    }

    #[test]
    fn test_exact_match_is_boosted_by_alpha() {
        let (engine, _) = engine();
        let params = ScoringParams {
            alpha: 1.0,
            top_k: 1,
            similarity_threshold: 0.0,
        };

        let scores = engine.score_text("Python", &params).unwrap();
        // similarity 1.0, weight 1.0, boosted by (1 + alpha)
        assert!((scores.get("Python").unwrap() - 2.0).abs() < 1e-6);
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_top_k_limits_skills_per_sentence() {
        let (engine, _) = engine();
        let params = ScoringParams {
            alpha: 0.0,
            top_k: 2,
            similarity_threshold: 0.0,
        };

        // Mentions all three skills: every similarity is 1/sqrt(3).
        let scores = engine
            .score_text("Python and Git with Communication", &params)
            .unwrap();
        assert_eq!(scores.len(), 2);
        // Ties keep vocabulary order.
        let labels: Vec<&str> = scores.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Python", "Communication"]);
    }

    #[test]
    fn test_sentence_weight_is_mean_of_selected() {
        let (engine, _) = engine();
        let params = ScoringParams {
            alpha: 0.0,
            top_k: 3,
            similarity_threshold: 0.0,
        };

        // Python and Git at 1/sqrt(2), Communication at 0 (still >= threshold).
        let scores = engine.score_text("Python with Git", &params).unwrap();
        let s = 1.0 / 2f32.sqrt();
        let weight = (s + s + 0.0) / 3.0;
        assert!((scores.get("Python").unwrap() - s * weight).abs() < 1e-6);
        // Zero contribution is dropped from the result.
        assert!(scores.get("Communication").is_none());
    }

    #[test]
    fn test_threshold_filters_before_selection() {
        let (engine, _) = engine();
        let params = ScoringParams {
            alpha: 1.0,
            top_k: 5,
            similarity_threshold: 0.5,
        };

        assert!(engine.score_text("Nothing relevant here", &params).unwrap().is_empty());
    }

    #[test]
    fn test_contributions_accumulate_across_sentences() {
        let (engine, _) = engine();
        let params = ScoringParams {
            alpha: 1.0,
            top_k: 1,
            similarity_threshold: 0.0,
        };

        let scores = engine.score_text("Python. More Python. Git", &params).unwrap();
        assert!((scores.get("Python").unwrap() - 4.0).abs() < 1e-6);
        assert!((scores.get("Git").unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_stream_matches_joined_text() {
        let (engine, _) = engine();
        let params = ScoringParams::default();

        let stream = engine.score_stream(["Python", "", "Git with Python"], &params).unwrap();
        let joined = engine.score_text("Python. Git with Python", &params).unwrap();
        assert_eq!(stream, joined);
    }

    #[test]
    fn test_zero_top_k_is_rejected() {
        let (engine, _) = engine();
        let params = ScoringParams {
            top_k: 0,
            ..ScoringParams::default()
        };
        let err = engine.score_text("Python", &params).unwrap_err();
        assert!(matches!(err, SkillMatcherError::InvalidInput(_)));
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let mut scores = SkillScores::default();
        scores.add("B", 0.5);
        scores.add("A", 0.9);
        scores.add("C", 0.5);
        scores.add("B", 0.0);

        let ranked = scores.into_ranked();
        let labels: Vec<&str> = ranked.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_scored_skill_wire_format() {
        let json = serde_json::to_string(&ScoredSkill::new("Python", 0.5)).unwrap();
        assert_eq!(json, r#"{"name":"Python","score":0.5}"#);
        let parsed: ScoredSkill = serde_json::from_str(r#"{"label":"Git","score":1.0}"#).unwrap();
        assert_eq!(parsed.label, "Git");
    }
}
