//! Input manager for text and JSON documents

use crate::error::{Result, SkillMatcherError};
use crate::input::file_detector::FileType;
use crate::processing::aggregator::SkillResult;
use crate::processing::document::{JobOffer, UserCv};
use log::info;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Contents of a text or Markdown file.
    pub async fn read_text(&mut self, path: &Path) -> Result<String> {
        match self.detect_file_type(path)? {
            FileType::Text => self.read_cached(path).await,
            other => Err(SkillMatcherError::InvalidInput(format!(
                "Expected a text file, got {:?}: {}",
                other,
                path.display()
            ))),
        }
    }

    /// Deserialize a JSON document.
    pub async fn load_json<T: DeserializeOwned>(&mut self, path: &Path) -> Result<T> {
        if self.detect_file_type(path)? != FileType::Json {
            return Err(SkillMatcherError::InvalidInput(format!(
                "Expected a .json file: {}",
                path.display()
            )));
        }
        let content = self.read_cached(path).await?;
        serde_json::from_str(&content).map_err(|e| {
            SkillMatcherError::InvalidInput(format!("Invalid JSON in {}: {}", path.display(), e))
        })
    }

    pub async fn load_job_offer(&mut self, path: &Path) -> Result<JobOffer> {
        info!("Loading job offer: {}", path.display());
        self.load_json(path).await
    }

    pub async fn load_cv(&mut self, path: &Path) -> Result<UserCv> {
        info!("Loading CV: {}", path.display());
        self.load_json(path).await
    }

    pub async fn load_skill_result(&mut self, path: &Path) -> Result<SkillResult> {
        info!("Loading skill result: {}", path.display());
        self.load_json(path).await
    }

    async fn read_cached(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached contents for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(SkillMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).await?;
        if self.enable_cache {
            self.cache.insert(path_str, content.clone());
        }
        Ok(content)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                SkillMatcherError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_text_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("offer.txt");
        std::fs::write(&path, "We need Python.").unwrap();

        let mut manager = InputManager::new();
        assert_eq!(manager.read_text(&path).await.unwrap(), "We need Python.");
        std::fs::remove_file(&path).unwrap();
        assert_eq!(manager.read_text(&path).await.unwrap(), "We need Python.");
        assert_eq!(manager.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_load_job_offer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("offer.json");
        std::fs::write(&path, r#"{"description": "Rust role", "technologies": ["Tokio"]}"#).unwrap();

        let offer = InputManager::new().load_job_offer(&path).await.unwrap();
        assert_eq!(offer.description.as_deref(), Some("Rust role"));
        assert!(offer.requirements.is_none());
    }

    #[tokio::test]
    async fn test_rejects_wrong_extension_and_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let text = temp_dir.path().join("cv.txt");
        let json = temp_dir.path().join("cv.json");
        std::fs::write(&text, "{}").unwrap();
        std::fs::write(&json, "{not json").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        assert!(matches!(
            manager.load_cv(&text).await.unwrap_err(),
            SkillMatcherError::InvalidInput(_)
        ));
        assert!(matches!(
            manager.load_cv(&json).await.unwrap_err(),
            SkillMatcherError::InvalidInput(_)
        ));
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = InputManager::new()
            .read_text(Path::new("/nonexistent/offer.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, SkillMatcherError::InvalidInput(_)));
    }
}
