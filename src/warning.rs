use std::fmt;
use std::path::PathBuf;

/// Non-fatal findings reported before or during a release.
/// None of them stop the release; they are shown so the user can abort.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// The working tree has changes that `git add --all` will sweep into the release commit
    UncommittedChanges,
    /// HEAD is not on the release branch; the sequence checks it out first
    NotOnMainBranch {
        current: Option<String>,
        main_branch: String,
    },
    /// A requested version does not parse as a semantic version
    NotSemver { version: String, reason: String },
    /// The old version string occurs more than once in a rewritten file
    AmbiguousVersion {
        file: PathBuf,
        version: String,
        occurrences: usize,
    },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::UncommittedChanges => {
                write!(
                    f,
                    "Working tree has uncommitted changes; they will be included in the release commit"
                )
            }
            ReleaseWarning::NotOnMainBranch {
                current,
                main_branch,
            } => {
                let current = current.as_deref().unwrap_or("detached HEAD");
                write!(
                    f,
                    "Currently on '{}'; release will switch to '{}'",
                    current, main_branch
                )
            }
            ReleaseWarning::NotSemver { version, reason } => {
                write!(f, "'{}' is not a semantic version: {}", version, reason)
            }
            ReleaseWarning::AmbiguousVersion {
                file,
                version,
                occurrences,
            } => {
                write!(
                    f,
                    "'{}' appears {} times in {}; every occurrence was replaced",
                    version,
                    occurrences,
                    file.display()
                )
            }
        }
    }
}
