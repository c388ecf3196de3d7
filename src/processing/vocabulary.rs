//! Fixed skill vocabulary partitioned into hard skills, soft skills and tools

use crate::error::{Result, SkillMatcherError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    #[serde(rename = "hard_skills")]
    HardSkill,
    #[serde(rename = "soft_skills")]
    SoftSkill,
    #[serde(rename = "tools")]
    Tool,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [
        SkillCategory::HardSkill,
        SkillCategory::SoftSkill,
        SkillCategory::Tool,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SkillCategory::HardSkill => "hard_skills",
            SkillCategory::SoftSkill => "soft_skills",
            SkillCategory::Tool => "tools",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillCategory::HardSkill => write!(f, "Hard skills"),
            SkillCategory::SoftSkill => write!(f, "Soft skills"),
            SkillCategory::Tool => write!(f, "Tools"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillVocabulary {
    #[serde(default)]
    pub hard_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl SkillVocabulary {
    /// Build and validate a vocabulary. Labels are trimmed.
    pub fn new(hard_skills: Vec<String>, soft_skills: Vec<String>, tools: Vec<String>) -> Result<Self> {
        let vocabulary = Self {
            hard_skills,
            soft_skills,
            tools,
        }
        .trimmed();
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Load a vocabulary from a `.toml` or `.json` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        let vocabulary: SkillVocabulary = match extension.as_deref() {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(SkillMatcherError::Vocabulary(format!(
                    "Unsupported vocabulary file (expected .toml or .json): {}",
                    path.display()
                )))
            }
        };

        let vocabulary = vocabulary.trimmed();
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    fn trimmed(mut self) -> Self {
        for labels in [&mut self.hard_skills, &mut self.soft_skills, &mut self.tools] {
            for label in labels.iter_mut() {
                if label.trim().len() != label.len() {
                    *label = label.trim().to_string();
                }
            }
        }
        self
    }

    /// Labels must be non-blank and appear exactly once across all categories.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<&str, SkillCategory> = HashMap::new();

        for (label, category) in self.iter() {
            let trimmed = label.trim();
            if trimmed.is_empty() {
                return Err(SkillMatcherError::Vocabulary(format!(
                    "Blank skill label in {}",
                    category.key()
                )));
            }
            if let Some(previous) = seen.insert(trimmed, category) {
                return Err(SkillMatcherError::Vocabulary(format!(
                    "Duplicate skill label '{}' in {} (already listed in {})",
                    trimmed,
                    category.key(),
                    previous.key()
                )));
            }
        }

        if seen.is_empty() {
            return Err(SkillMatcherError::Vocabulary("Vocabulary has no skills".to_string()));
        }
        Ok(())
    }

    pub fn labels(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::HardSkill => &self.hard_skills,
            SkillCategory::SoftSkill => &self.soft_skills,
            SkillCategory::Tool => &self.tools,
        }
    }

    /// All trimmed labels with their category: hard skills, then soft skills, then tools.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SkillCategory)> + '_ {
        SkillCategory::ALL
            .into_iter()
            .flat_map(move |category| self.labels(category).iter().map(move |label| (label.trim(), category)))
    }

    pub fn len(&self) -> usize {
        self.hard_skills.len() + self.soft_skills.len() + self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        fn owned(labels: &[&str]) -> Vec<String> {
            labels.iter().map(|s| s.to_string()).collect()
        }

        Self {
            hard_skills: owned(&[
                // Languages
                "Python", "Java", "JavaScript", "TypeScript", "C", "C++", "C#", "Go", "Rust",
                "Kotlin", "Swift", "PHP", "Ruby", "Scala", "SQL", "HTML", "CSS",
                // Engineering practice
                "Object-Oriented Programming", "Functional Programming", "Algorithms",
                "Data Structures", "System Design", "Microservices", "REST API Design",
                "GraphQL", "Distributed Systems", "Concurrency", "Software Testing",
                "Test-Driven Development", "Continuous Integration", "Continuous Delivery",
                "DevOps", "Cloud Computing", "Networking", "Cybersecurity", "Cryptography",
                // Data
                "Machine Learning", "Deep Learning", "Natural Language Processing",
                "Computer Vision", "Data Analysis", "Data Engineering", "Statistics",
                "Data Visualization", "Database Design", "ETL",
                // Product and design
                "Frontend Development", "Backend Development", "Mobile Development",
                "UI Design", "UX Research", "Accessibility", "Embedded Systems",
            ]),
            soft_skills: owned(&[
                "Communication", "Teamwork", "Leadership", "Problem Solving", "Critical Thinking",
                "Time Management", "Adaptability", "Creativity", "Collaboration", "Mentoring",
                "Negotiation", "Presentation Skills", "Conflict Resolution", "Decision Making",
                "Attention to Detail", "Project Management", "Stakeholder Management",
                "Customer Orientation", "Self-Motivation", "Emotional Intelligence",
            ]),
            tools: owned(&[
                "Git", "GitHub", "GitLab", "Docker", "Kubernetes", "Terraform", "Ansible",
                "Jenkins", "AWS", "Azure", "Google Cloud Platform", "Linux", "PostgreSQL",
                "MySQL", "MongoDB", "Redis", "Elasticsearch", "Kafka", "RabbitMQ", "Spark",
                "Airflow", "React", "Angular", "Vue.js", "Node.js", "Django", "Flask",
                "FastAPI", "Spring Boot", ".NET", "TensorFlow", "PyTorch", "scikit-learn",
                "Pandas", "NumPy", "Jupyter", "Tableau", "Power BI", "Excel", "Jira",
                "Confluence", "Figma", "Postman", "Grafana", "Prometheus", "Nginx",
            ]),
        }
    }
}
