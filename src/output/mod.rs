//! Output module
//! Console, JSON and Markdown rendering of skill reports

pub mod formatter;
pub mod report;

pub use formatter::{save_report_to_file, OutputFormatter, ReportGenerator};
pub use report::{AnalysisReport, ReportBody};
