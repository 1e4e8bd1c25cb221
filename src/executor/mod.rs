//! External command execution
//!
//! Every task ends up shelling out to some tool (poetry, git, pre-commit...).
//! Tasks only talk to the [CommandExecutor] trait so tests can swap in the
//! recording [mock::MockExecutor] instead of spawning processes.
//!
//! - [process::ProcessExecutor]: spawns real child processes in the project directory
//! - [mock::MockExecutor]: records invocations and replays scripted results

pub mod mock;
pub mod process;

pub use mock::{Invocation, MockExecutor};
pub use process::ProcessExecutor;

use crate::error::Result;

/// Narrow interface over external tool invocation.
pub trait CommandExecutor {
    /// Run `program` with `args`, letting stdout/stderr pass through.
    ///
    /// # Returns
    /// * `Ok(())` - The process exited with status 0
    /// * `Err(TaskError::ExternalTool)` - Non-zero exit, carrying the exit code
    /// * `Err(TaskError::Spawn)` - The program could not be started
    fn run(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Run `program` with `args` and capture its stdout.
    ///
    /// stderr still passes through. Fails like [CommandExecutor::run].
    fn output(&self, program: &str, args: &[&str]) -> Result<String>;

    /// Whether `program` can be found on the search path.
    fn is_available(&self, program: &str) -> bool;
}
