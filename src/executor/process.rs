use crate::error::{Result, TaskError};
use crate::executor::CommandExecutor;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// Runs external tools as child processes of the current one.
///
/// Children inherit stdio and run in the configured working directory.
/// There is no timeout: a hanging tool blocks the run.
pub struct ProcessExecutor {
    working_dir: PathBuf,
}

impl ProcessExecutor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        ProcessExecutor {
            working_dir: working_dir.into(),
        }
    }

    fn command(&self, program: &str, args: &[&str]) -> Command {
        log::debug!(
            "Running `{} {}` in {}",
            program,
            args.join(" "),
            self.working_dir.display()
        );
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.working_dir);
        cmd
    }
}

fn check_status(program: &str, args: &[&str], status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    Err(TaskError::ExternalTool {
        program: program.to_string(),
        args: args.iter().map(|arg| arg.to_string()).collect(),
        code: status.code(),
    })
}

fn spawn_error(program: &str, source: std::io::Error) -> TaskError {
    TaskError::Spawn {
        program: program.to_string(),
        source,
    }
}

impl CommandExecutor for ProcessExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        let status = self
            .command(program, args)
            .status()
            .map_err(|e| spawn_error(program, e))?;

        check_status(program, args, status)
    }

    fn output(&self, program: &str, args: &[&str]) -> Result<String> {
        let output = self
            .command(program, args)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| spawn_error(program, e))?;

        check_status(program, args, output.status)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn is_available(&self, program: &str) -> bool {
        match which::which(program) {
            Ok(path) => {
                log::debug!("Found {} at {}", program, path.display());
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_spawn_error() {
        let executor = ProcessExecutor::new(std::env::temp_dir());
        let err = executor
            .run("temply-tasks-no-such-program", &["--version"])
            .unwrap_err();
        assert!(matches!(err, TaskError::Spawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let executor = ProcessExecutor::new(std::env::temp_dir());
        assert!(!executor.is_available("temply-tasks-no-such-program"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_is_reported() {
        let executor = ProcessExecutor::new(std::env::temp_dir());
        let err = executor.run("sh", &["-c", "exit 3"]).unwrap_err();
        match err {
            TaskError::ExternalTool { ref program, code, .. } => {
                assert_eq!(program, "sh");
                assert_eq!(code, Some(3));
            }
            ref other => panic!("expected external tool error, got {}", other),
        }
        assert_eq!(err.exit_code(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_output_captures_stdout() {
        let executor = ProcessExecutor::new(std::env::temp_dir());
        let out = executor.output("sh", &["-c", "echo venv"]).unwrap();
        assert_eq!(out.trim(), "venv");
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let executor = ProcessExecutor::new(dir.path());
        executor.run("sh", &["-c", "touch marker"]).unwrap();
        assert!(dir.path().join("marker").exists());
    }
}
