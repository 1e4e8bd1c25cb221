//! Main workflow orchestration logic
//!
//! Turns parsed CLI arguments into a task run: loads configuration, wires the
//! process executor into a [TaskContext], then runs the requested task through
//! the registry. Releases are checked against the git repository and
//! confirmed before any task starts.

use crate::cli::{Args, Command};
use crate::config::{self, Config};
use crate::error::{Result, TaskError};
use crate::executor::{CommandExecutor, ProcessExecutor};
use crate::git::{Git2Repository, Repository};
use crate::release::{self, ReleaseRequest};
use crate::tasks::{builtin, RunReport, TaskContext};
use crate::ui;

/// Runs the subcommand described by `args`.
///
/// # Returns
/// * `Ok(())` - The task (and its prerequisites) succeeded, or the user cancelled a release
/// * `Err` - The first failure; [TaskError::exit_code] gives the status to exit with
pub fn execute(args: &Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref(), &args.project_dir)?;
    let executor = ProcessExecutor::new(&args.project_dir);

    let task = match args.command.task_name() {
        Some(task) => task,
        None => {
            let ctx = context(&executor, &config, args, None);
            ui::display_tasks(builtin::registry(&ctx)?.tasks());
            return Ok(());
        }
    };

    let mut release = None;
    if let Command::Release {
        release_version,
        next_version,
        force,
    } = &args.command
    {
        let request = ReleaseRequest::new(release_version.as_str(), next_version.as_str())?;
        let repository = Git2Repository::open(&args.project_dir)?;

        let confirmed = confirm_release(&repository, &config, &request, || {
            if *force {
                return Ok(true);
            }
            ui::confirm_action("Create and push this release?")
                .map_err(|e| TaskError::release(format!("cannot read confirmation: {}", e)))
        })?;
        if !confirmed {
            println!("Release cancelled by user.");
            return Ok(());
        }
        release = Some(request);
    }

    let ctx = context(&executor, &config, args, release);
    let report = run_task(&ctx, task)?;
    ui::display_success(&format!("Completed {}", report.executed.join(", ")));
    Ok(())
}

/// Checks a release before anything runs, shows the plan and its warnings,
/// then asks `confirm`.
///
/// # Returns
/// * `Ok(true)` - The release may go ahead
/// * `Ok(false)` - The user declined
/// * `Err` - Preflight refused the release; `confirm` was not called
pub fn confirm_release(
    repository: &dyn Repository,
    config: &Config,
    request: &ReleaseRequest,
    confirm: impl FnOnce() -> Result<bool>,
) -> Result<bool> {
    let warnings = release::preflight(repository, &config.release, request)?;

    ui::display_release_plan(&config.project.name, request);
    for warning in &warnings {
        ui::display_warning(warning);
    }

    confirm()
}

/// Runs one named task from the built-in registry.
pub fn run_task(ctx: &TaskContext<'_>, task: &str) -> Result<RunReport> {
    builtin::registry(ctx)?.run(task)
}

fn context<'a>(
    executor: &'a dyn CommandExecutor,
    config: &'a Config,
    args: &'a Args,
    release: Option<ReleaseRequest>,
) -> TaskContext<'a> {
    TaskContext {
        executor,
        // preflight already ran in confirm_release
        repository: None,
        config,
        project_dir: &args.project_dir,
        release,
    }
}
