#![allow(dead_code)]

use git2::{Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch temply checkout with `pyproject.toml` and `temply/__init__.py`.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new(version: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("temply")).unwrap();
        fs::write(
            dir.path().join("temply").join("__init__.py"),
            format!("__version__ = \"{}\"\n", version),
        )
        .unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            format!(
                r#"[tool.poetry]
name = "temply"
version = "{}"
description = "Render jinja2 templates on the command line"
repository = "https://github.com/amannocci/temply"

[tool.poetry.dependencies]
python = "^3.11"
"#,
                version
            ),
        )
        .unwrap();
        Project { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn descriptor(&self) -> PathBuf {
        self.path().join("pyproject.toml")
    }

    pub fn metadata(&self) -> PathBuf {
        self.path().join("temply").join("__init__.py")
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.path().join("temply-tasks.toml");
        fs::write(&path, content).unwrap();
        path
    }
}

impl Project {
    /// Turns the project into a git checkout on `main` with one commit
    /// ("init") holding every file written so far.
    pub fn init_git(&self) -> Repository {
        let mut options = RepositoryInitOptions::new();
        options.initial_head("main");
        let repo = Repository::init_opts(self.path(), &options).unwrap();

        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Release Bot").unwrap();
            config.set_str("user.email", "bot@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
            config.set_bool("tag.gpgsign", false).unwrap();

            let mut index = repo.index().unwrap();
            index
                .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
                .unwrap();
            index.write().unwrap();
            let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
            let signature = Signature::now("Release Bot", "bot@example.com").unwrap();
            repo.commit(Some("HEAD"), &signature, &signature, "init", &tree, &[])
                .unwrap();
        }

        repo
    }

    /// Adds a bare `origin` next to the checkout, pushes `main` to it and
    /// sets it as upstream. Returns the bare repository.
    pub fn add_remote(&self, repo: &Repository, remote_dir: &Path) -> Repository {
        let bare = Repository::init_bare(remote_dir).unwrap();
        let mut remote = repo
            .remote("origin", remote_dir.to_str().unwrap())
            .unwrap();
        remote
            .push(&["refs/heads/main:refs/heads/main"], None)
            .unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("branch.main.remote", "origin").unwrap();
        config
            .set_str("branch.main.merge", "refs/heads/main")
            .unwrap();

        bare
    }
}
