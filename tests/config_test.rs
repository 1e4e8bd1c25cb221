use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use temply_tasks::config::{load_config, Config, CONFIG_FILE_NAME};
use temply_tasks::TaskError;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.project.name, "temply");
    assert_eq!(config.project.descriptor, PathBuf::from("pyproject.toml"));
    assert_eq!(config.tools.package_manager, "poetry");
    assert_eq!(config.tools.upgrader, "poetryup");
    assert_eq!(config.build.spec, "temply.spec");
    assert_eq!(config.release.main_branch, "main");
    assert!(config.release.sign_off);
}

#[test]
fn test_load_from_explicit_file() {
    let config = load_config(
        Some(PathBuf::from("tests/fixtures/temply-tasks.toml").as_path()),
        &PathBuf::from("."),
    )
    .expect("Failed to load test config");

    assert_eq!(config.tools.package_manager, "uv");
    assert!(config.tools.extras.is_empty());
    assert_eq!(config.project.sources, vec!["temply", "scripts"]);
    assert_eq!(config.project.tests, vec!["tests"]);
    assert_eq!(config.build.spec, "temply.linux.spec");
    assert_eq!(config.release.main_branch, "master");
    assert!(!config.release.sign_off);
}

#[test]
fn test_load_from_project_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[release]\nmain_branch = \"trunk\"\n",
    )
    .unwrap();

    let config = load_config(None, dir.path()).unwrap();
    assert_eq!(config.release.main_branch, "trunk");
    assert_eq!(config.tools.package_manager, "poetry");
}

#[test]
fn test_explicit_path_wins_over_project_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[release]\nmain_branch = \"trunk\"\n",
    )
    .unwrap();
    let mut custom = NamedTempFile::new().unwrap();
    custom
        .write_all(b"[release]\nmain_branch = \"stable\"\n")
        .unwrap();
    custom.flush().unwrap();

    let config = load_config(Some(custom.path()), dir.path()).unwrap();
    assert_eq!(config.release.main_branch, "stable");
}

#[test]
fn test_missing_explicit_file_is_error() {
    let err = load_config(
        Some(PathBuf::from("/nonexistent/temply-tasks.toml").as_path()),
        &PathBuf::from("."),
    )
    .unwrap_err();
    assert!(matches!(err, TaskError::Config(_)));
}

#[test]
fn test_malformed_file_is_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[tools\n").unwrap();

    assert!(matches!(
        load_config(None, dir.path()),
        Err(TaskError::Config(_))
    ));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_user_config_dir_fallback() {
    let project = TempDir::new().unwrap();
    let xdg = TempDir::new().unwrap();
    std::fs::write(
        xdg.path().join(CONFIG_FILE_NAME),
        "[tools]\npackage_manager = \"pdm\"\n",
    )
    .unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", xdg.path());
    let result = load_config(None, project.path());
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(result.unwrap().tools.package_manager, "pdm");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_defaults_when_no_file_found() {
    let project = TempDir::new().unwrap();
    let xdg = TempDir::new().unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", xdg.path());
    let result = load_config(None, project.path());
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(result.unwrap(), Config::default());
}
