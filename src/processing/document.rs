//! CV and job offer documents

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Section body: either free text or a list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    Text(String),
    List(Vec<String>),
}

impl SectionContent {
    /// The text fed to the scorer. List items are joined with spaces.
    pub fn to_text(&self) -> String {
        match self {
            SectionContent::Text(text) => text.clone(),
            SectionContent::List(items) => items.join(" "),
        }
    }
}

/// Named sections of one document, in document order.
pub type DocumentSections = Vec<(String, Option<SectionContent>)>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobOffer {
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
}

impl JobOffer {
    pub fn sections(&self) -> DocumentSections {
        vec![
            (
                "description".to_string(),
                self.description.clone().map(SectionContent::Text),
            ),
            (
                "technologies".to_string(),
                self.technologies.clone().map(SectionContent::List),
            ),
            (
                "requirements".to_string(),
                self.requirements.clone().map(SectionContent::List),
            ),
            (
                "responsibilities".to_string(),
                self.responsibilities.clone().map(SectionContent::List),
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LanguageLevel {
    Basic,
    Intermediate,
    Advanced,
    Native,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Intern,
    Junior,
    Mid,
    Senior,
    Lead,
    Principal,
}

/// Free-text summary of an experience, project or internship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvSummary {
    pub text: Option<String>,
    pub technologies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub other: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub position: Option<String>,
    pub company: Option<String>,
    pub url: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub summaries: Option<Vec<CvSummary>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvSkill {
    pub name: Option<String>,
    pub level: Option<Level>,
    pub years_of_experience: Option<f32>,
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub language: Option<String>,
    pub level: Option<LanguageLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub summaries: Option<Vec<CvSummary>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserCv {
    pub personal_info: Option<PersonalInfo>,
    pub technologies: Option<Vec<String>>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
    pub skills: Option<Vec<CvSkill>>,
    pub languages: Option<Vec<Language>>,
    pub certifications: Option<Vec<Certification>>,
    pub projects: Option<Vec<Project>>,
    pub internships: Option<Vec<Experience>>,
}

impl UserCv {
    /// Every summary the scorer annotates: experience, projects, internships.
    pub fn summaries_mut(&mut self) -> impl Iterator<Item = &mut CvSummary> + '_ {
        let experience = self.experience.iter_mut().flatten();
        let internships = self.internships.iter_mut().flatten();
        let from_jobs = experience
            .chain(internships)
            .flat_map(|entry| entry.summaries.iter_mut().flatten());
        let from_projects = self
            .projects
            .iter_mut()
            .flatten()
            .flat_map(|project| project.summaries.iter_mut().flatten());
        from_jobs.chain(from_projects)
    }

    pub fn full_name(&self) -> String {
        let info = self.personal_info.as_ref();
        let parts = [
            info.and_then(|i| i.first_name.as_deref()),
            info.and_then(|i| i.last_name.as_deref()),
        ];
        parts.into_iter().flatten().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_offer_sections_keep_order_and_nulls() {
        let offer = JobOffer {
            description: Some("Backend role.".to_string()),
            technologies: Some(vec!["Rust".to_string(), "Kafka".to_string()]),
            requirements: None,
            responsibilities: Some(vec![]),
        };

        let sections = offer.sections();
        let names: Vec<&str> = sections.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["description", "technologies", "requirements", "responsibilities"]);
        assert!(sections[2].1.is_none());
        assert_eq!(sections[1].1.as_ref().unwrap().to_text(), "Rust Kafka");
    }

    #[test]
    fn test_section_content_deserializes_both_shapes() {
        let text: SectionContent = serde_json::from_str(r#""plain text""#).unwrap();
        let list: SectionContent = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(text, SectionContent::Text("plain text".to_string()));
        assert_eq!(list.to_text(), "a b");
    }

    #[test]
    fn test_cv_parses_partial_document() {
        let json = r#"{
            "personal_info": {"first_name": "Jan", "last_name": "Kowalski"},
            "experience": [{
                "position": "Developer",
                "start_date": "2020-01-01",
                "summaries": [{"text": "Worked with Python", "technologies": []}]
            }],
            "skills": [{"name": "Python", "level": "SENIOR", "years_of_experience": 5}],
            "languages": [{"language": "English", "level": "ADVANCED"}]
        }"#;

        let cv: UserCv = serde_json::from_str(json).unwrap();
        assert_eq!(cv.full_name(), "Jan Kowalski");
        let experience = &cv.experience.as_ref().unwrap()[0];
        assert_eq!(experience.start_date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(cv.skills.as_ref().unwrap()[0].level, Some(Level::Senior));
    }

    #[test]
    fn test_summaries_mut_walks_all_sections() {
        let summary = |text: &str| CvSummary {
            text: Some(text.to_string()),
            technologies: None,
        };
        let mut cv = UserCv {
            experience: Some(vec![Experience {
                summaries: Some(vec![summary("a"), summary("b")]),
                ..Default::default()
            }]),
            internships: Some(vec![Experience {
                summaries: Some(vec![summary("c")]),
                ..Default::default()
            }]),
            projects: Some(vec![Project {
                summaries: Some(vec![summary("d")]),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let texts: Vec<String> = cv.summaries_mut().filter_map(|s| s.text.clone()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }
}
