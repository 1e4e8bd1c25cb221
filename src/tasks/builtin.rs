//! Tasks driving the temply project
//!
//! Each task maps to one or more external tool invocations. Everything except
//! `project:upgrade` first runs `env:configure`.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::descriptor::DescriptorReader;
use crate::error::{Result, TaskError};
use crate::executor::CommandExecutor;
use crate::git::Repository;
use crate::release::{self, ReleaseOrchestrator, ReleaseRequest};
use crate::tasks::{Registry, Task};
use crate::ui;
use crate::version::VersionRewriter;

pub const UPGRADE: &str = "project:upgrade";
pub const CONFIGURE: &str = "env:configure";
pub const GENERATE: &str = "generate";
pub const LINT: &str = "lint";
pub const FMT: &str = "fmt";
pub const BUILD: &str = "build";
pub const TEST: &str = "test";
pub const RELEASE: &str = "release";

/// Everything a task body needs.
pub struct TaskContext<'a> {
    pub executor: &'a dyn CommandExecutor,
    /// Checked by the `release` preflight. `None` when the caller already ran
    /// [release::preflight] itself.
    pub repository: Option<&'a dyn Repository>,
    pub config: &'a Config,
    pub project_dir: &'a Path,
    /// Only required by `release`
    pub release: Option<ReleaseRequest>,
}

impl TaskContext<'_> {
    fn path(&self, relative: &Path) -> PathBuf {
        self.project_dir.join(relative)
    }

    fn package_manager(&self) -> &str {
        &self.config.tools.package_manager
    }

    /// `<package manager> run <tool> <args...>`
    fn run_tool(&self, tool: &str, args: &[&str]) -> Result<()> {
        let mut full = vec!["run", tool];
        full.extend_from_slice(args);
        self.executor.run(self.package_manager(), &full)
    }

    /// Version rewriter over the metadata file and the descriptor.
    pub fn version_rewriter(&self) -> VersionRewriter {
        let project = &self.config.project;
        VersionRewriter::new(
            DescriptorReader::new(self.path(&project.descriptor)),
            project
                .version_files()
                .iter()
                .map(|file| self.path(file))
                .collect(),
        )
    }
}

/// Builds the registry of all built-in tasks bound to `ctx`.
pub fn registry<'a>(ctx: &'a TaskContext<'a>) -> Result<Registry<'a>> {
    let mut registry = Registry::new();

    registry.register(Task::new(UPGRADE, "Update dependencies", move || {
        upgrade(ctx)
    }))?;
    registry.register(Task::new(CONFIGURE, "Configures environment", move || {
        configure(ctx)
    }))?;
    registry.register(
        Task::new(GENERATE, "Generates project files", move || generate(ctx))
            .depends_on(&[CONFIGURE]),
    )?;
    registry.register(
        Task::new(LINT, "Lints the project", move || lint(ctx)).depends_on(&[CONFIGURE]),
    )?;
    registry.register(
        Task::new(FMT, "Formats the project", move || format_code(ctx)).depends_on(&[CONFIGURE]),
    )?;
    registry.register(
        Task::new(BUILD, "Builds the project", move || build(ctx)).depends_on(&[CONFIGURE]),
    )?;
    registry.register(
        Task::new(TEST, "Run tests on this project", move || test(ctx)).depends_on(&[CONFIGURE]),
    )?;
    registry.register(
        Task::new(RELEASE, "Create a new release of the project", move || {
            release(ctx)
        })
        .depends_on(&[CONFIGURE]),
    )?;

    Ok(registry)
}

fn upgrade(ctx: &TaskContext<'_>) -> Result<()> {
    ui::display_status("Upgrading project dependencies...");
    ctx.executor.run(&ctx.config.tools.upgrader, &["--latest"])
}

fn configure(ctx: &TaskContext<'_>) -> Result<()> {
    ui::display_status("Install project dependencies...");
    let mut args = vec!["install"];
    for extra in &ctx.config.tools.extras {
        args.extend(["-E", extra.as_str()]);
    }
    ctx.executor.run(ctx.package_manager(), &args)?;

    let pre_commit = ctx.config.tools.pre_commit.as_str();
    if ctx.executor.is_available(pre_commit) {
        ui::display_status("Install pre-commit hooks...");
        if let Err(e) = ctx.executor.run(pre_commit, &["install"]) {
            log::warn!("Could not install pre-commit hooks: {}", e);
        }
    } else {
        log::debug!("{} not found, skipping hook installation", pre_commit);
    }

    write_pyright_config(ctx)
}

#[derive(Debug, Serialize, PartialEq)]
struct PyrightConfig {
    venv: String,
    #[serde(rename = "venvPath")]
    venv_path: String,
}

/// Points pyright at the project virtualenv. An existing file is never touched.
fn write_pyright_config(ctx: &TaskContext<'_>) -> Result<()> {
    let target = ctx.path(&ctx.config.build.pyright_config);
    if target.exists() {
        return Ok(());
    }

    let venv = match ctx
        .executor
        .output(ctx.package_manager(), &["env", "info", "-p"])
    {
        Ok(output) => output.trim().to_string(),
        Err(e) => {
            log::warn!("Could not locate the project virtualenv: {}", e);
            return Ok(());
        }
    };

    let Some(config) = pyright_config_for(Path::new(&venv)) else {
        log::warn!("No virtualenv reported; {} not written", target.display());
        return Ok(());
    };

    let content = serde_json::to_string(&config)
        .map_err(|e| TaskError::config(format!("cannot serialize pyright config: {}", e)))?;
    fs::write(&target, content).map_err(|e| TaskError::io(&target, e))?;
    log::info!("Wrote {}", target.display());
    Ok(())
}

fn pyright_config_for(venv: &Path) -> Option<PyrightConfig> {
    let name = venv.file_name()?.to_string_lossy().into_owned();
    let parent = venv.parent()?.to_string_lossy().into_owned();

    Some(PyrightConfig {
        venv: name,
        venv_path: parent,
    })
}

fn generate(ctx: &TaskContext<'_>) -> Result<()> {
    ui::display_status("Generates pyinstaller specs...");
    let project = &ctx.config.project;
    ctx.run_tool(
        "pyinstaller",
        &[
            "-n",
            project.name.as_str(),
            "--onefile",
            "--noconfirm",
            project.entrypoint.as_str(),
        ],
    )
}

fn lint(ctx: &TaskContext<'_>) -> Result<()> {
    ui::display_status("Linting project...");
    let sources: Vec<&str> = ctx.config.project.sources.iter().map(String::as_str).collect();
    ctx.run_tool("pylint", &sources)
}

fn format_code(ctx: &TaskContext<'_>) -> Result<()> {
    ui::display_status("Formatting project...");
    let project = &ctx.config.project;
    let paths: Vec<&str> = project
        .sources
        .iter()
        .chain(&project.tests)
        .map(String::as_str)
        .collect();
    ctx.run_tool("black", &paths)
}

/// Removes a directory tree; a missing directory is not an error.
fn remove_dir(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TaskError::io(path, e)),
    }
}

fn build(ctx: &TaskContext<'_>) -> Result<()> {
    ui::display_status("Clean previous build");
    for dir in &ctx.config.build.clean {
        remove_dir(&ctx.path(dir))?;
    }

    ui::display_status("Create a binary executable");
    ctx.run_tool("pyinstaller", &[ctx.config.build.spec.as_str()])
}

fn test(ctx: &TaskContext<'_>) -> Result<()> {
    ui::display_status("Run tests...");
    ctx.run_tool("pytest", &[])
}

fn release(ctx: &TaskContext<'_>) -> Result<()> {
    let request = ctx.release.as_ref().ok_or_else(|| {
        TaskError::release("a release version and a next version are required")
    })?;
    if let Some(repository) = ctx.repository {
        for warning in release::preflight(repository, &ctx.config.release, request)? {
            ui::display_warning(&warning);
        }
    }

    ui::display_status(&format!(
        "Releasing {} {}",
        ctx.config.project.name,
        request.release_version()
    ));
    let orchestrator = ReleaseOrchestrator::new(
        ctx.executor,
        ctx.version_rewriter(),
        ctx.config.project.name.clone(),
        ctx.config.release.clone(),
    );
    let outcome = orchestrator.release(request)?;

    for warning in outcome.warnings() {
        ui::display_warning(&warning);
    }
    ui::display_success(&format!(
        "Released {} {}; now on {}",
        ctx.config.project.name,
        request.release_version(),
        request.next_version()
    ));
    Ok(())
}
