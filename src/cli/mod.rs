//! Command-line surface
//!
//! One subcommand per task, plus `list`. Parsing lives here; wiring the
//! parsed arguments to the task registry lives in [orchestration].

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tasks::builtin;

pub mod orchestration;

#[derive(Parser, Debug)]
#[command(
    name = "temply-tasks",
    version,
    about = "Build, test and release tasks for the temply project"
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = ".",
        help = "Project directory to run tasks in"
    )]
    pub project_dir: PathBuf,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Update dependencies
    Upgrade,
    /// Configures environment
    Configure,
    /// Generates project files
    Generate,
    /// Lints the project
    Lint,
    /// Formats the project
    Fmt,
    /// Builds the project
    Build,
    /// Run tests on this project
    Test,
    /// Create a new release of the project
    Release {
        /// Version to release and tag
        release_version: String,
        /// Development version committed after the release
        next_version: String,
        #[arg(short, long, help = "Skip confirmation prompt")]
        force: bool,
    },
    /// Show available tasks and exit
    List,
}

impl Command {
    /// Registry name of the task this subcommand runs.
    pub fn task_name(&self) -> Option<&'static str> {
        match self {
            Command::Upgrade => Some(builtin::UPGRADE),
            Command::Configure => Some(builtin::CONFIGURE),
            Command::Generate => Some(builtin::GENERATE),
            Command::Lint => Some(builtin::LINT),
            Command::Fmt => Some(builtin::FMT),
            Command::Build => Some(builtin::BUILD),
            Command::Test => Some(builtin::TEST),
            Command::Release { .. } => Some(builtin::RELEASE),
            Command::List => None,
        }
    }
}
