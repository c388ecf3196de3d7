//! Output formatters for skill reports

use crate::config::OutputFormat;
use crate::error::{Result, SkillMatcherError};
use crate::output::report::{AnalysisReport, ReportBody, ReportMetadata};
use crate::processing::aggregator::SkillResult;
use crate::processing::document::UserCv;
use crate::processing::scorer::ScoredSkill;
use crate::processing::vocabulary::SkillCategory;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter. Emits only the report body, in the wire format.
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn annotated_summaries(cv: &UserCv) -> Vec<(String, Vec<String>)> {
    let label = |kind: &str, name: Option<&str>| match name {
        Some(name) => format!("{}: {}", kind, name),
        None => kind.to_string(),
    };

    let mut rows = Vec::new();
    for experience in cv.experience.iter().flatten() {
        for summary in experience.summaries.iter().flatten() {
            rows.push((
                label("Experience", experience.position.as_deref()),
                summary.technologies.clone().unwrap_or_default(),
            ));
        }
    }
    for internship in cv.internships.iter().flatten() {
        for summary in internship.summaries.iter().flatten() {
            rows.push((
                label("Internship", internship.position.as_deref()),
                summary.technologies.clone().unwrap_or_default(),
            ));
        }
    }
    for project in cv.projects.iter().flatten() {
        for summary in project.summaries.iter().flatten() {
            rows.push((
                label("Project", project.name.as_deref()),
                summary.technologies.clone().unwrap_or_default(),
            ));
        }
    }
    rows
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_metadata(&self, metadata: &ReportMetadata) -> String {
        let mut line = format!("Generated: {}", metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        if let Some(source) = &metadata.source {
            line.push_str(&format!(" | Source: {}", source));
        }
        if let Some(model) = &metadata.model_name {
            line.push_str(&format!(" | Model: {}", model));
        }
        if let Some(params) = &metadata.params {
            line.push_str(&format!(
                " | alpha={} top_k={} threshold={}",
                params.alpha, params.top_k, params.similarity_threshold
            ));
        }
        format!("{}\n", self.colorize(&line, Color::BrightBlack))
    }

    fn format_skills(&self, skills: &[ScoredSkill]) -> String {
        if skills.is_empty() {
            return format!("  {}\n", self.colorize("(none)", Color::BrightBlack));
        }

        let width = skills.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
        skills
            .iter()
            .enumerate()
            .map(|(i, skill)| {
                format!(
                    "  {:>2}. {:<width$}  {}\n",
                    i + 1,
                    skill.label,
                    self.colorize(&format!("{:.4}", skill.score), Color::Cyan),
                    width = width
                )
            })
            .collect()
    }

    fn format_skill_result(&self, result: &SkillResult) -> String {
        let mut output = String::new();
        for category in SkillCategory::ALL {
            output.push_str(&self.format_header(&category.to_string(), 2));
            output.push_str(&self.format_skills(result.category(category)));
        }
        output
    }

    fn format_cv(&self, cv: &UserCv) -> String {
        let mut output = String::new();
        let name = cv.full_name();
        if !name.is_empty() {
            output.push_str(&format!("Candidate: {}\n", self.colorize(&name, Color::White)));
        }

        let rows = annotated_summaries(cv);
        if rows.is_empty() {
            output.push_str("No summaries to annotate.\n");
        }
        for (label, technologies) in rows {
            output.push_str(&self.format_header(&label, 2));
            if technologies.is_empty() {
                output.push_str(&format!("  {}\n", self.colorize("(no technologies)", Color::BrightBlack)));
            } else {
                output.push_str(&format!("  {}\n", technologies.join(", ")));
            }
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = self.format_header(&report.metadata.title, 1);
        output.push_str(&self.format_metadata(&report.metadata));

        match &report.body {
            ReportBody::Skills(result) => output.push_str(&self.format_skill_result(result)),
            ReportBody::Ranked(skills) => {
                output.push_str(&self.format_header("Detected skills", 2));
                output.push_str(&self.format_skills(skills));
            }
            ReportBody::Cv(cv) => output.push_str(&self.format_cv(cv)),
            ReportBody::Bio(bio) => {
                output.push('\n');
                output.push_str(bio.trim());
                output.push('\n');
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(&report.body)?)
        } else {
            Ok(serde_json::to_string(&report.body)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn skills_table(skills: &[ScoredSkill]) -> String {
        if skills.is_empty() {
            return "_None detected._\n".to_string();
        }
        let mut table = String::from("| # | Skill | Score |\n|---|-------|-------|\n");
        for (i, skill) in skills.iter().enumerate() {
            table.push_str(&format!("| {} | {} | {:.4} |\n", i + 1, skill.label.replace('|', "\\|"), skill.score));
        }
        table
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = format!("# {}\n\n", report.metadata.title);

        if self.include_metadata {
            let metadata = &report.metadata;
            output.push_str(&format!(
                "- **Generated:** {}\n",
                metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            if let Some(source) = &metadata.source {
                output.push_str(&format!("- **Source:** `{}`\n", source));
            }
            if let Some(model) = &metadata.model_name {
                output.push_str(&format!("- **Model:** {}\n", model));
            }
            if let Some(params) = &metadata.params {
                output.push_str(&format!(
                    "- **Parameters:** alpha = {}, top_k = {}, threshold = {}\n",
                    params.alpha, params.top_k, params.similarity_threshold
                ));
            }
            output.push('\n');
        }

        match &report.body {
            ReportBody::Skills(result) => {
                for category in SkillCategory::ALL {
                    output.push_str(&format!("## {}\n\n", category));
                    output.push_str(&Self::skills_table(result.category(category)));
                    output.push('\n');
                }
            }
            ReportBody::Ranked(skills) => {
                output.push_str("## Detected skills\n\n");
                output.push_str(&Self::skills_table(skills));
            }
            ReportBody::Cv(cv) => {
                for (label, technologies) in annotated_summaries(cv) {
                    output.push_str(&format!("## {}\n\n", label));
                    for technology in technologies {
                        output.push_str(&format!("- {}\n", technology));
                    }
                    output.push('\n');
                }
            }
            ReportBody::Bio(bio) => {
                output.push_str(bio.trim());
                output.push('\n');
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content).map_err(|e| {
        SkillMatcherError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::{CvSummary, Experience};
    use tempfile::TempDir;

    fn skills_report() -> AnalysisReport {
        AnalysisReport::new(
            "Job offer skills",
            ReportBody::Skills(SkillResult {
                hard_skills: vec![ScoredSkill::new("Python", 1.8824)],
                soft_skills: vec![ScoredSkill::new("Communication", 0.5)],
                tools: vec![],
            }),
        )
        .with_source("offer.json")
    }

    #[test]
    fn test_json_emits_wire_format_only() {
        let json = JsonFormatter::new(false).format_report(&skills_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["hard_skills"][0]["name"], "Python");
        assert_eq!(value["tools"], serde_json::json!([]));
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_report(&skills_report()).unwrap();

        assert!(output.contains("Job offer skills"));
        assert!(output.contains("Hard skills"));
        assert!(output.contains("Python"));
        assert!(output.contains("1.8824"));
        assert!(output.contains("(none)"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_markdown_tables() {
        let output = MarkdownFormatter::new(true).format_report(&skills_report()).unwrap();

        assert!(output.starts_with("# Job offer skills"));
        assert!(output.contains("- **Source:** `offer.json`"));
        assert!(output.contains("| 1 | Python | 1.8824 |"));
        assert!(output.contains("## Tools\n\n_None detected._"));
    }

    #[test]
    fn test_cv_report_lists_technologies() {
        let cv = UserCv {
            experience: Some(vec![Experience {
                position: Some("Developer".into()),
                summaries: Some(vec![CvSummary {
                    text: Some("Python work".into()),
                    technologies: Some(vec!["Python".into(), "Git".into()]),
                }]),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let report = AnalysisReport::new("Annotated CV", ReportBody::Cv(Box::new(cv)));

        let output = ReportGenerator::with_options(false, true, false)
            .generate_report(&report, OutputFormat::Markdown)
            .unwrap();
        assert!(output.contains("## Experience: Developer"));
        assert!(output.contains("- Python\n- Git"));
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports/nested/out.md");

        save_report_to_file("# Report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Report");
    }
}
