use crate::error::Result;
use crate::git::Repository;
use std::collections::HashSet;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    tags: HashSet<String>,
    branch: Option<String>,
    dirty: bool,
}

impl MockRepository {
    /// Create a clean mock repository checked out on `main`
    pub fn new() -> Self {
        MockRepository {
            tags: HashSet::new(),
            branch: Some("main".to_string()),
            dirty: false,
        }
    }

    /// Add an existing tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.insert(name.into());
    }

    /// Set the checked-out branch (`None` for a detached HEAD)
    pub fn set_branch(&mut self, branch: Option<&str>) {
        self.branch = branch.map(|name| name.to_string());
    }

    /// Mark the working tree as modified
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.contains(name))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("1.0.0");

        assert!(repo.tag_exists("1.0.0").unwrap());
        assert!(!repo.tag_exists("2.0.0").unwrap());
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert_eq!(repo.current_branch().unwrap(), Some("main".to_string()));
        assert!(!repo.has_uncommitted_changes().unwrap());
    }

    #[test]
    fn test_mock_repository_detached() {
        let mut repo = MockRepository::new();
        repo.set_branch(None);
        repo.set_dirty(true);
        assert_eq!(repo.current_branch().unwrap(), None);
        assert!(repo.has_uncommitted_changes().unwrap());
    }
}
