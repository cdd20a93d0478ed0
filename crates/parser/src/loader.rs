//! Local file loader for external references

use crate::resolver::DocumentLoader;
use oaslice_common::{OpenApiError, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Reads external documents from the local file system
///
/// Locators arrive already joined with the referencing document's path;
/// relative ones are taken from `root` when set. URLs are refused, there is
/// no network access.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    root: Option<PathBuf>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl DocumentLoader for FileLoader {
    fn load(&self, locator: &str) -> Result<String> {
        if locator.contains("://") && !locator.starts_with("file://") {
            return Err(OpenApiError::ExternalDocument {
                locator: locator.to_string(),
                message: "only local files can be loaded".to_string(),
            });
        }
        let path = PathBuf::from(locator.trim_start_matches("file://"));
        let path = match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        };
        debug!(path = %path.display(), "loading external document");
        fs::read_to_string(&path).map_err(|e| OpenApiError::ExternalDocument {
            locator: locator.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_relative_to_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("common.yaml"), "components: {}\n").unwrap();

        let loader = FileLoader::with_root(dir.path());
        assert_eq!(loader.load("common.yaml").unwrap(), "components: {}\n");
    }

    #[test]
    fn test_missing_file_and_urls_fail() {
        let loader = FileLoader::new();
        assert!(matches!(
            loader.load("does/not/exist.yaml"),
            Err(OpenApiError::ExternalDocument { .. })
        ));
        assert!(matches!(
            loader.load("https://example.com/api.yaml"),
            Err(OpenApiError::ExternalDocument { .. })
        ));
    }
}
