//! Project descriptor reader.
//!
//! Extracts the version and repository URL from the `[tool.poetry]` table of
//! `pyproject.toml`. The file is re-read on every call so callers always see
//! what is on disk right now.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::error::{Result, TaskError};

/// Snapshot of the descriptor fields the tasks care about.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDescriptor {
    pub version: String,
    pub repository: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PyProject {
    tool: Option<ToolTable>,
}

#[derive(Debug, Deserialize)]
struct ToolTable {
    poetry: Option<PoetryTable>,
}

#[derive(Debug, Deserialize)]
struct PoetryTable {
    version: Option<String>,
    repository: Option<String>,
}

impl ProjectDescriptor {
    /// Parses descriptor content.
    ///
    /// # Returns
    /// * `Ok(ProjectDescriptor)` - When `tool.poetry.version` is a non-empty string
    /// * `Err(TaskError::Config)` - On malformed TOML or a missing/empty version
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: PyProject = toml::from_str(content)
            .map_err(|e| TaskError::config(format!("descriptor is not valid TOML: {}", e)))?;

        let poetry = document
            .tool
            .and_then(|tool| tool.poetry)
            .ok_or_else(|| TaskError::config("descriptor has no [tool.poetry] table"))?;

        let version = poetry
            .version
            .ok_or_else(|| TaskError::config("descriptor is missing tool.poetry.version"))?;

        if version.is_empty() {
            return Err(TaskError::config("tool.poetry.version is empty"));
        }

        Ok(ProjectDescriptor {
            version,
            repository: poetry.repository.filter(|url| !url.is_empty()),
        })
    }
}

/// Reads the project descriptor from a fixed path.
#[derive(Debug, Clone)]
pub struct DescriptorReader {
    path: PathBuf,
}

impl DescriptorReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DescriptorReader { path: path.into() }
    }

    /// Loads the descriptor from disk. No caching.
    pub fn read(&self) -> Result<ProjectDescriptor> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            TaskError::config(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        ProjectDescriptor::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYPROJECT: &str = r#"
[tool.poetry]
name = "temply"
version = "0.7.1"
repository = "https://github.com/amannocci/temply"

[tool.poetry.dependencies]
python = "^3.11"
"#;

    #[test]
    fn test_parse_version_and_repository() {
        let descriptor = ProjectDescriptor::from_toml_str(PYPROJECT).unwrap();
        assert_eq!(descriptor.version, "0.7.1");
        assert_eq!(
            descriptor.repository.as_deref(),
            Some("https://github.com/amannocci/temply")
        );
    }

    #[test]
    fn test_repository_is_optional() {
        let descriptor =
            ProjectDescriptor::from_toml_str("[tool.poetry]\nversion = \"1.0.0\"\n").unwrap();
        assert_eq!(descriptor.repository, None);
    }

    #[test]
    fn test_missing_version_is_config_error() {
        let err = ProjectDescriptor::from_toml_str("[tool.poetry]\nname = \"temply\"\n")
            .unwrap_err();
        assert!(matches!(err, TaskError::Config(_)));
        assert!(err.to_string().contains("tool.poetry.version"));
    }

    #[test]
    fn test_missing_poetry_table_is_config_error() {
        let err = ProjectDescriptor::from_toml_str("[project]\nversion = \"1.0.0\"\n")
            .unwrap_err();
        assert!(matches!(err, TaskError::Config(_)));
    }

    #[test]
    fn test_empty_version_is_config_error() {
        let err =
            ProjectDescriptor::from_toml_str("[tool.poetry]\nversion = \"\"\n").unwrap_err();
        assert!(matches!(err, TaskError::Config(_)));
    }

    #[test]
    fn test_non_string_version_is_config_error() {
        let err = ProjectDescriptor::from_toml_str("[tool.poetry]\nversion = 3\n").unwrap_err();
        assert!(matches!(err, TaskError::Config(_)));
    }

    #[test]
    fn test_read_missing_file() {
        let reader = DescriptorReader::new("/nonexistent/pyproject.toml");
        let err = reader.read().unwrap_err();
        assert!(matches!(err, TaskError::Config(_)));
        assert!(err.to_string().contains("/nonexistent/pyproject.toml"));
    }
}
