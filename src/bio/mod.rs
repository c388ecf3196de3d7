//! Candidate bio generation from a CV, a job offer and its skill analysis

pub mod generator;
pub mod prompts;

pub use generator::{BioGenerator, OllamaBioGenerator};
pub use prompts::{build_payload, PromptTemplate};

use crate::processing::aggregator::SkillResult;
use crate::processing::document::{JobOffer, UserCv};
use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioRequest {
    pub user_cv: UserCv,
    pub skill_result: SkillResult,
    pub job_offer: JobOffer,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for BioRequest {
    fn default() -> Self {
        Self {
            user_cv: UserCv::default(),
            skill_result: SkillResult::default(),
            job_offer: JobOffer::default(),
            language: default_language(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_defaults_to_english() {
        let request: BioRequest =
            serde_json::from_str(r#"{"user_cv": {}, "skill_result": {"hard_skills": [], "soft_skills": [], "tools": []}, "job_offer": {}}"#)
                .unwrap();
        assert_eq!(request.language, "en");
    }
}
