//! Read-only git repository inspection
//!
//! The release sequence itself runs through the `git` command line (see
//! [crate::release]); this module only answers questions about the local
//! repository before anything is changed.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Repository queries used by the release preflight.
///
/// Implementation should map underlying errors (like `git2::Error`) to
/// [crate::error::TaskError] variants.
pub trait Repository {
    /// Whether `refs/tags/<name>` exists locally.
    ///
    /// # Returns
    /// * `Ok(true)` / `Ok(false)` - Tag presence
    /// * `Err` - If the name is not a valid reference or a Git error occurs
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Short name of the checked-out branch.
    ///
    /// # Returns
    /// * `Ok(Some(name))` - HEAD points at a branch
    /// * `Ok(None)` - Detached HEAD or a branch with no commits yet
    fn current_branch(&self) -> Result<Option<String>>;

    /// Whether the working tree has modified, staged or untracked files.
    fn has_uncommitted_changes(&self) -> Result<bool>;
}
