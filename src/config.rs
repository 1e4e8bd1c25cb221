use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TaskError};

/// File name searched for in the project directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "temply-tasks.toml";

/// Represents the complete configuration for temply-tasks.
///
/// Contains the project layout, the external tool names, packaging settings and release options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

fn default_project_name() -> String {
    "temply".to_string()
}

fn default_descriptor() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

fn default_metadata_file() -> PathBuf {
    PathBuf::from("temply").join("__init__.py")
}

fn default_sources() -> Vec<String> {
    vec!["temply".to_string()]
}

fn default_tests() -> Vec<String> {
    vec!["tests".to_string()]
}

fn default_entrypoint() -> String {
    "./bin/temply".to_string()
}

/// Layout of the Python project being driven.
///
/// All paths are relative to the project directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Project descriptor holding `tool.poetry.version`
    #[serde(default = "default_descriptor")]
    pub descriptor: PathBuf,

    /// Runtime metadata file carrying `__version__`
    #[serde(default = "default_metadata_file")]
    pub metadata_file: PathBuf,

    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    #[serde(default = "default_tests")]
    pub tests: Vec<String>,

    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            name: default_project_name(),
            descriptor: default_descriptor(),
            metadata_file: default_metadata_file(),
            sources: default_sources(),
            tests: default_tests(),
            entrypoint: default_entrypoint(),
        }
    }
}

impl ProjectConfig {
    /// Files rewritten on a version change, in rewrite order.
    pub fn version_files(&self) -> Vec<PathBuf> {
        vec![self.metadata_file.clone(), self.descriptor.clone()]
    }
}

fn default_package_manager() -> String {
    "poetry".to_string()
}

fn default_upgrader() -> String {
    "poetryup".to_string()
}

fn default_pre_commit() -> String {
    "pre-commit".to_string()
}

fn default_extras() -> Vec<String> {
    vec!["build".to_string()]
}

/// Names of the external programs the tasks shell out to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolsConfig {
    #[serde(default = "default_package_manager")]
    pub package_manager: String,

    #[serde(default = "default_upgrader")]
    pub upgrader: String,

    #[serde(default = "default_pre_commit")]
    pub pre_commit: String,

    /// Optional dependency groups installed by `env:configure`
    #[serde(default = "default_extras")]
    pub extras: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            package_manager: default_package_manager(),
            upgrader: default_upgrader(),
            pre_commit: default_pre_commit(),
            extras: default_extras(),
        }
    }
}

fn default_build_spec() -> String {
    "temply.spec".to_string()
}

fn default_clean() -> Vec<PathBuf> {
    vec![PathBuf::from("build"), PathBuf::from("dist")]
}

fn default_pyright_config() -> PathBuf {
    PathBuf::from("pyrightconfig.json")
}

/// Packaging settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildConfig {
    /// PyInstaller spec consumed by the `build` task
    #[serde(default = "default_build_spec")]
    pub spec: String,

    /// Directories removed before a build
    #[serde(default = "default_clean")]
    pub clean: Vec<PathBuf>,

    #[serde(default = "default_pyright_config")]
    pub pyright_config: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            spec: default_build_spec(),
            clean: default_clean(),
            pyright_config: default_pyright_config(),
        }
    }
}

fn default_main_branch() -> String {
    "main".to_string()
}

fn default_sign_off() -> bool {
    true
}

/// Release sequence options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    /// Pass `-s` to both release commits
    #[serde(default = "default_sign_off")]
    pub sign_off: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            main_branch: default_main_branch(),
            sign_off: default_sign_off(),
        }
    }
}

/// Parses a configuration document.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| TaskError::config(format!("invalid {}: {}", CONFIG_FILE_NAME, e)))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `temply-tasks.toml` in the project directory
/// 3. `temply-tasks.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `project_dir` - Directory of the project being driven
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or the custom path is missing
pub fn load_config(config_path: Option<&Path>, project_dir: &Path) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if project_dir.join(CONFIG_FILE_NAME).exists() {
        project_dir.join(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            path
        } else {
            log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    log::debug!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(&path).map_err(|e| {
        TaskError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&content)
}
