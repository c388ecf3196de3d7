//! Input file classification by extension

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Plain text or Markdown, scored as-is.
    Text,
    Json,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" | "md" | "markdown" => FileType::Text,
            "json" => FileType::Json,
            _ => FileType::Unknown,
        }
    }
}
