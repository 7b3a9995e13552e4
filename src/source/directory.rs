//! Directory-based provider for offline and demo use.
//!
//! Reads `<dir>/<resource>.json` on every fetch, so editing a fixture file
//! shows up on the next poll.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::{DataProvider, Resource};
use crate::error::FetchError;

/// A provider that serves resource payloads from JSON files on disk.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    dir: PathBuf,
    description: String,
}

impl DirectoryProvider {
    /// Create a provider rooted at `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let description = format!("fixtures: {}", dir.display());
        Self { dir, description }
    }

    /// Returns the directory being served.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the fixture file for a resource.
    pub fn file_for(&self, resource: Resource) -> PathBuf {
        self.dir.join(format!("{}.json", resource.name()))
    }
}

#[async_trait]
impl DataProvider for DirectoryProvider {
    async fn fetch(&self, resource: Resource) -> Result<Value, FetchError> {
        let content = tokio::fs::read_to_string(self.file_for(resource)).await?;
        Ok(serde_json::from_str(&content)?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directory_provider_new() {
        let provider = DirectoryProvider::new("/tmp/fixtures");
        assert_eq!(provider.dir(), Path::new("/tmp/fixtures"));
        assert_eq!(provider.description(), "fixtures: /tmp/fixtures");
        assert_eq!(
            provider.file_for(Resource::Alerts),
            Path::new("/tmp/fixtures/alerts.json")
        );
    }

    #[tokio::test]
    async fn test_fetch_reads_resource_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("threats.json"), r#"[{"type": "Malware"}]"#).unwrap();

        let provider = DirectoryProvider::new(dir.path());
        let value = provider.fetch(Resource::Threats).await.unwrap();
        assert_eq!(value[0]["type"], "Malware");
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let dir = TempDir::new().unwrap();
        let provider = DirectoryProvider::new(dir.path());

        let err = provider.fetch(Resource::Logs).await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("status.json"), "not valid json").unwrap();

        let provider = DirectoryProvider::new(dir.path());
        let err = provider.fetch(Resource::Status).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
