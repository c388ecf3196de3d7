//! Prompt template and payload assembly for bio generation

use crate::bio::BioRequest;
use crate::error::Result;
use crate::processing::scorer::ScoredSkill;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

/// Instructions sent to the language model alongside the candidate data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PromptTemplate {
    #[serde(default)]
    pub instructions: Value,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            instructions: json!({
                "task": "Write a short professional bio for the candidate, tailored to the job offer.",
                "style": "First person, confident, no more than 120 words, no bullet points.",
                "focus": [
                    "Highlight skills from SkillResult that appear in the JobOffer",
                    "Mention the candidate's role when it is known",
                    "Do not invent employers, degrees or certifications"
                ],
                "output": "Return only the bio text."
            }),
        }
    }
}

impl PromptTemplate {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading bio prompt from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The file at `path` when given, the built-in prompt otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

fn skill_pairs(skills: &[ScoredSkill]) -> Value {
    Value::Array(
        skills
            .iter()
            .map(|skill| json!([skill.label, skill.score]))
            .collect(),
    )
}

/// Everything the model sees, serialised into the `prompt` field.
pub fn build_payload(request: &BioRequest, template: &PromptTemplate) -> Value {
    let cv = &request.user_cv;
    let info = cv.personal_info.clone().unwrap_or_default();
    let skills = cv.skills.as_deref().unwrap_or_default();

    let experience_years = skills
        .iter()
        .filter_map(|skill| skill.years_of_experience)
        .fold(0.0_f32, f32::max);

    let cv_skills: Vec<Value> = skills
        .iter()
        .map(|skill| {
            json!({
                "name": skill.name.clone().unwrap_or_default(),
                "level": skill.level.map(|l| json!(l)).unwrap_or_else(|| json!("")),
                "years_of_experience": skill.years_of_experience.unwrap_or(0.0),
            })
        })
        .collect();

    let offer = &request.job_offer;
    let result = &request.skill_result;

    json!({
        "instructions": template.instructions,
        "language": request.language,
        "UserCV": {
            "personal_info": {
                "first_name": info.first_name.unwrap_or_default(),
                "last_name": info.last_name.unwrap_or_default(),
            },
            "role": info.summary.unwrap_or_default(),
            "experience_years": experience_years,
            "skills": cv_skills,
        },
        "JobOffer": {
            "description": offer.description.clone().unwrap_or_default(),
            "technologies": offer.technologies.clone().unwrap_or_default(),
            "requirements": offer.requirements.clone().unwrap_or_default(),
            "responsibilities": offer.responsibilities.clone().unwrap_or_default(),
        },
        "SkillResult": {
            "hard_skills": skill_pairs(&result.hard_skills),
            "soft_skills": skill_pairs(&result.soft_skills),
            "tools": skill_pairs(&result.tools),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::aggregator::SkillResult;
    use crate::processing::document::{CvSkill, JobOffer, Level, PersonalInfo, UserCv};
    use tempfile::TempDir;

    fn request() -> BioRequest {
        BioRequest {
            user_cv: UserCv {
                personal_info: Some(PersonalInfo {
                    first_name: Some("Anna".into()),
                    last_name: Some("Nowak".into()),
                    summary: Some("Data engineer".into()),
                    ..Default::default()
                }),
                skills: Some(vec![
                    CvSkill {
                        name: Some("Python".into()),
                        level: Some(Level::Senior),
                        years_of_experience: Some(6.0),
                        keywords: None,
                    },
                    CvSkill {
                        name: Some("SQL".into()),
                        ..Default::default()
                    },
                ]),
                ..Default::default()
            },
            skill_result: SkillResult {
                hard_skills: vec![ScoredSkill::new("Python", 1.5)],
                soft_skills: vec![],
                tools: vec![ScoredSkill::new("Git", 0.25)],
            },
            job_offer: JobOffer {
                description: Some("Build pipelines".into()),
                ..Default::default()
            },
            language: "en".into(),
        }
    }

    #[test]
    fn test_payload_shape() {
        let payload = build_payload(&request(), &PromptTemplate::default());

        assert_eq!(payload["UserCV"]["personal_info"]["first_name"], "Anna");
        assert_eq!(payload["UserCV"]["role"], "Data engineer");
        assert_eq!(payload["UserCV"]["experience_years"], 6.0);
        assert_eq!(payload["UserCV"]["skills"][0]["level"], "SENIOR");
        assert_eq!(payload["UserCV"]["skills"][1]["level"], "");
        assert_eq!(payload["JobOffer"]["technologies"], json!([]));
        assert_eq!(payload["SkillResult"]["hard_skills"], json!([["Python", 1.5]]));
        assert_eq!(payload["SkillResult"]["tools"], json!([["Git", 0.25]]));
        assert_eq!(payload["language"], "en");
        assert!(payload["instructions"].is_object());
    }

    #[test]
    fn test_missing_personal_info_yields_empty_strings() {
        let mut request = request();
        request.user_cv = UserCv::default();

        let payload = build_payload(&request, &PromptTemplate::default());
        assert_eq!(payload["UserCV"]["personal_info"]["last_name"], "");
        assert_eq!(payload["UserCV"]["experience_years"], 0.0);
        assert_eq!(payload["UserCV"]["skills"], json!([]));
    }

    #[test]
    fn test_prompt_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prompt.json");
        std::fs::write(&path, r#"{"instructions": "Write a haiku bio."}"#).unwrap();

        let template = PromptTemplate::load(Some(&path)).unwrap();
        assert_eq!(template.instructions, json!("Write a haiku bio."));
    }

    #[test]
    fn test_missing_prompt_file_is_io_error() {
        let err = PromptTemplate::from_file("/nonexistent/prompt.json").unwrap_err();
        assert!(matches!(err, crate::error::SkillMatcherError::Io(_)));
    }
}
