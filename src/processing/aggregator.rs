//! Cross-text aggregation and per-category ranking

use crate::processing::scorer::{sort_descending, ScoredSkill, SkillScores};
use crate::processing::skill_index::SkillEmbeddingIndex;
use crate::processing::vocabulary::SkillCategory;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillResult {
    pub hard_skills: Vec<ScoredSkill>,
    pub soft_skills: Vec<ScoredSkill>,
    pub tools: Vec<ScoredSkill>,
}

impl SkillResult {
    pub fn category(&self, category: SkillCategory) -> &[ScoredSkill] {
        match category {
            SkillCategory::HardSkill => &self.hard_skills,
            SkillCategory::SoftSkill => &self.soft_skills,
            SkillCategory::Tool => &self.tools,
        }
    }

    fn category_mut(&mut self, category: SkillCategory) -> &mut Vec<ScoredSkill> {
        match category {
            SkillCategory::HardSkill => &mut self.hard_skills,
            SkillCategory::SoftSkill => &mut self.soft_skills,
            SkillCategory::Tool => &mut self.tools,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hard_skills.is_empty() && self.soft_skills.is_empty() && self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hard_skills.len() + self.soft_skills.len() + self.tools.len()
    }
}

/// Sum per-text totals. Skills keep the order they were first seen in.
pub fn sum_scores<'a, I>(per_text: I) -> SkillScores
where
    I: IntoIterator<Item = &'a SkillScores>,
{
    let mut combined = SkillScores::default();
    for scores in per_text {
        combined.merge(scores);
    }
    combined
}

/// Partition by category, rank each category, then truncate.
///
/// Labels unknown to the index are dropped.
pub fn categorize(
    index: &SkillEmbeddingIndex,
    scores: &SkillScores,
    max_results_per_category: Option<usize>,
) -> SkillResult {
    let mut result = SkillResult::default();

    for (label, score) in scores.iter() {
        match index.category_of(label) {
            Some(category) => result.category_mut(category).push(ScoredSkill::new(label, score)),
            None => warn!("Dropping score for skill outside the vocabulary: {}", label),
        }
    }

    for category in SkillCategory::ALL {
        let skills = result.category_mut(category);
        sort_descending(skills);
        if let Some(limit) = max_results_per_category {
            skills.truncate(limit);
        }
    }

    result
}
