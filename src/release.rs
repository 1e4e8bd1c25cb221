//! Release sequence
//!
//! Cuts a release with two commits and one tag:
//! the version is set to the release version, committed and tagged, then set
//! to the next development version and committed again, and finally commits
//! and tags are pushed. Steps run strictly in order and the first failure
//! aborts the rest. Nothing already done locally is undone.

use std::fmt;

use crate::config::ReleaseConfig;
use crate::error::{Result, TaskError};
use crate::executor::CommandExecutor;
use crate::git::Repository;
use crate::version::{RewriteReport, VersionRewriter};
use crate::warning::ReleaseWarning;

/// Message of the commit that moves to the next development version.
pub const NEXT_ITERATION_MESSAGE: &str = "[Updated] Prepare for next iteration";

/// Versions supplied by the caller.
///
/// Only emptiness is rejected; anything else is used verbatim as replacement
/// text and as the tag name.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseRequest {
    release_version: String,
    next_version: String,
}

impl ReleaseRequest {
    pub fn new(release_version: impl Into<String>, next_version: impl Into<String>) -> Result<Self> {
        let release_version = release_version.into();
        let next_version = next_version.into();

        if release_version.is_empty() {
            return Err(TaskError::version("release version must not be empty"));
        }
        if next_version.is_empty() {
            return Err(TaskError::version("next version must not be empty"));
        }

        Ok(ReleaseRequest {
            release_version,
            next_version,
        })
    }

    pub fn release_version(&self) -> &str {
        &self.release_version
    }

    pub fn next_version(&self) -> &str {
        &self.next_version
    }

    /// Warnings for versions that are not valid semantic versions.
    pub fn semver_warnings(&self) -> Vec<ReleaseWarning> {
        [&self.release_version, &self.next_version]
            .into_iter()
            .filter_map(|version| {
                semver::Version::parse(version)
                    .err()
                    .map(|e| ReleaseWarning::NotSemver {
                        version: version.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}

/// The ten steps of a release, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStep {
    Checkout,
    SetReleaseVersion,
    StageRelease,
    CommitRelease,
    TagRelease,
    SetNextVersion,
    StageNext,
    CommitNext,
    PushCommits,
    PushTags,
}

impl ReleaseStep {
    pub const ALL: [ReleaseStep; 10] = [
        ReleaseStep::Checkout,
        ReleaseStep::SetReleaseVersion,
        ReleaseStep::StageRelease,
        ReleaseStep::CommitRelease,
        ReleaseStep::TagRelease,
        ReleaseStep::SetNextVersion,
        ReleaseStep::StageNext,
        ReleaseStep::CommitNext,
        ReleaseStep::PushCommits,
        ReleaseStep::PushTags,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            ReleaseStep::Checkout => "switch to the main branch",
            ReleaseStep::SetReleaseVersion => "set release version",
            ReleaseStep::StageRelease => "stage release changes",
            ReleaseStep::CommitRelease => "commit release",
            ReleaseStep::TagRelease => "tag release",
            ReleaseStep::SetNextVersion => "set next development version",
            ReleaseStep::StageNext => "stage next iteration changes",
            ReleaseStep::CommitNext => "commit next iteration",
            ReleaseStep::PushCommits => "push commits",
            ReleaseStep::PushTags => "push tags",
        }
    }
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// What a successful release did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseOutcome {
    pub completed: Vec<ReleaseStep>,
    /// Reports of the two version rewrites, release first
    pub rewrites: Vec<RewriteReport>,
}

impl ReleaseOutcome {
    /// Over-matching observed while rewriting versions.
    pub fn warnings(&self) -> Vec<ReleaseWarning> {
        self.rewrites
            .iter()
            .flat_map(|report| {
                report
                    .ambiguous_files()
                    .map(|(file, occurrences)| ReleaseWarning::AmbiguousVersion {
                        file: file.clone(),
                        version: report.previous.clone(),
                        occurrences: *occurrences,
                    })
            })
            .collect()
    }
}

/// Checks that run before anything is modified.
///
/// # Returns
/// * `Ok(warnings)` - Release may proceed; warnings should be shown to the user
/// * `Err` - The release tag already exists, or the repository could not be inspected
pub fn preflight(
    repository: &dyn Repository,
    settings: &ReleaseConfig,
    request: &ReleaseRequest,
) -> Result<Vec<ReleaseWarning>> {
    if repository.tag_exists(request.release_version())? {
        return Err(TaskError::release(format!(
            "release `{}` already exists",
            request.release_version()
        )));
    }

    let mut warnings = request.semver_warnings();

    let current = repository.current_branch()?;
    if current.as_deref() != Some(settings.main_branch.as_str()) {
        warnings.push(ReleaseWarning::NotOnMainBranch {
            current,
            main_branch: settings.main_branch.clone(),
        });
    }

    if repository.has_uncommitted_changes()? {
        warnings.push(ReleaseWarning::UncommittedChanges);
    }

    Ok(warnings)
}

/// Drives the release sequence through git and the version rewriter.
pub struct ReleaseOrchestrator<'a> {
    executor: &'a dyn CommandExecutor,
    rewriter: VersionRewriter,
    project_name: String,
    settings: ReleaseConfig,
}

impl<'a> ReleaseOrchestrator<'a> {
    pub fn new(
        executor: &'a dyn CommandExecutor,
        rewriter: VersionRewriter,
        project_name: impl Into<String>,
        settings: ReleaseConfig,
    ) -> Self {
        ReleaseOrchestrator {
            executor,
            rewriter,
            project_name: project_name.into(),
            settings,
        }
    }

    /// Message of the release commit.
    pub fn release_message(&self, request: &ReleaseRequest) -> String {
        format!(
            "[Released] {} {}",
            self.project_name,
            request.release_version()
        )
    }

    /// Run all ten steps in order.
    ///
    /// # Returns
    /// * `Ok(ReleaseOutcome)` - Every step completed
    /// * `Err` - The failing step's error; later steps were not attempted
    pub fn release(&self, request: &ReleaseRequest) -> Result<ReleaseOutcome> {
        let mut outcome = ReleaseOutcome::default();
        let total = ReleaseStep::ALL.len();

        for (index, step) in ReleaseStep::ALL.into_iter().enumerate() {
            log::info!("[{}/{}] {}", index + 1, total, step);
            if let Err(e) = self.execute(step, request, &mut outcome) {
                log::error!("Release stopped at step {} ({}): {}", index + 1, step, e);
                return Err(e);
            }
            outcome.completed.push(step);
        }

        Ok(outcome)
    }

    fn execute(
        &self,
        step: ReleaseStep,
        request: &ReleaseRequest,
        outcome: &mut ReleaseOutcome,
    ) -> Result<()> {
        match step {
            ReleaseStep::Checkout => self.git(&["checkout", self.settings.main_branch.as_str()]),
            ReleaseStep::SetReleaseVersion => {
                let report = self.rewriter.set_version(request.release_version())?;
                outcome.rewrites.push(report);
                Ok(())
            }
            ReleaseStep::StageRelease | ReleaseStep::StageNext => self.git(&["add", "--all"]),
            ReleaseStep::CommitRelease => self.commit(&self.release_message(request)),
            ReleaseStep::TagRelease => self.git(&["tag", request.release_version()]),
            ReleaseStep::SetNextVersion => {
                let report = self.rewriter.set_version(request.next_version())?;
                outcome.rewrites.push(report);
                Ok(())
            }
            ReleaseStep::CommitNext => self.commit(NEXT_ITERATION_MESSAGE),
            ReleaseStep::PushCommits => self.git(&["push"]),
            ReleaseStep::PushTags => self.git(&["push", "--tags"]),
        }
    }

    fn commit(&self, message: &str) -> Result<()> {
        let mut args = vec!["commit"];
        if self.settings.sign_off {
            args.push("-s");
        }
        args.extend(["-m", message]);
        self.git(&args)
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        self.executor.run("git", args)
    }
}
