use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for temply-tasks operations
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` failed with {}", command_line(program, args), describe_code(*code))]
    ExternalTool {
        program: String,
        args: Vec<String>,
        code: Option<i32>,
    },

    #[error("Failed to start `{}`: {}", program, source)]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Task error: {0}")]
    Task(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Release error: {0}")]
    Release(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),
}

/// Convenience type alias for Results in temply-tasks
pub type Result<T> = std::result::Result<T, TaskError>;

fn command_line(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl TaskError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TaskError::Config(msg.into())
    }

    /// Create an I/O error bound to the file it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaskError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a task registry/runner error
    pub fn task(msg: impl Into<String>) -> Self {
        TaskError::Task(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        TaskError::Version(msg.into())
    }

    /// Create a release error with context
    pub fn release(msg: impl Into<String>) -> Self {
        TaskError::Release(msg.into())
    }

    /// Process exit status to report for this error.
    ///
    /// A failing external tool passes its own exit code through; everything
    /// else (including tools killed by a signal) maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskError::ExternalTool {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TaskError::config("missing tool.poetry.version");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing tool.poetry.version"
        );
    }

    #[test]
    fn test_io_error_mentions_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = TaskError::io("temply/__init__.py", io_err);
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("temply/__init__.py"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_external_tool_display() {
        let err = TaskError::ExternalTool {
            program: "poetry".to_string(),
            args: vec!["run".to_string(), "pylint".to_string(), "temply".to_string()],
            code: Some(4),
        };
        assert_eq!(
            err.to_string(),
            "`poetry run pylint temply` failed with exit code 4"
        );
    }

    #[test]
    fn test_external_tool_without_code() {
        let err = TaskError::ExternalTool {
            program: "pytest".to_string(),
            args: vec![],
            code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_passes_tool_status_through() {
        let err = TaskError::ExternalTool {
            program: "git".to_string(),
            args: vec!["push".to_string()],
            code: Some(128),
        };
        assert_eq!(err.exit_code(), 128);
    }

    #[test]
    fn test_exit_code_defaults_to_one() {
        let errors = vec![
            TaskError::config("x"),
            TaskError::task("x"),
            TaskError::version("x"),
            TaskError::release("x"),
            TaskError::io("x", std::io::Error::other("boom")),
        ];

        for err in errors {
            assert_eq!(err.exit_code(), 1, "unexpected exit code for {}", err);
        }
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (TaskError::config("x"), "Configuration error"),
            (TaskError::task("x"), "Task error"),
            (TaskError::version("x"), "Version error"),
            (TaskError::release("x"), "Release error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_git_error_conversion() {
        let err: TaskError = git2::Error::from_str("reference not found").into();
        assert!(err.to_string().starts_with("Git operation failed"));
    }
}
