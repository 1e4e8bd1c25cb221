use std::fs;
use std::path::PathBuf;

use crate::descriptor::DescriptorReader;
use crate::error::{Result, TaskError};

/// Outcome of a single version rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteReport {
    /// Version found in the descriptor before the rewrite
    pub previous: String,
    /// Version written
    pub current: String,
    /// Replacement count per rewritten file, in rewrite order
    pub files: Vec<(PathBuf, usize)>,
}

impl RewriteReport {
    /// Files in which the old version appeared more than once.
    ///
    /// Every occurrence is replaced, so any hit here may have touched an
    /// unrelated field that happened to contain the same text.
    pub fn ambiguous_files(&self) -> impl Iterator<Item = &(PathBuf, usize)> {
        self.files.iter().filter(|(_, count)| *count > 1)
    }
}

/// Rewrites the project version across the metadata file and the descriptor.
///
/// This is plain byte substitution: every literal occurrence of the current
/// version string is replaced, wherever it appears in the file. Files need
/// not be valid UTF-8.
#[derive(Debug, Clone)]
pub struct VersionRewriter {
    reader: DescriptorReader,
    targets: Vec<PathBuf>,
}

impl VersionRewriter {
    /// Creates a rewriter.
    ///
    /// # Arguments
    /// * `reader` - Source of the current version
    /// * `targets` - Files to rewrite, in order
    pub fn new(reader: DescriptorReader, targets: Vec<PathBuf>) -> Self {
        VersionRewriter { reader, targets }
    }

    /// Replaces the current version with `new_version` in every target file.
    ///
    /// The current version is read from the descriptor at call time, so two
    /// consecutive calls chain: the second one replaces what the first wrote.
    /// Files are written one after another; a failure part-way leaves earlier
    /// files already rewritten.
    ///
    /// # Returns
    /// * `Ok(RewriteReport)` - Replacement counts per file
    /// * `Err` - Empty `new_version`, unreadable descriptor, or a file read/write failure
    pub fn set_version(&self, new_version: &str) -> Result<RewriteReport> {
        if new_version.is_empty() {
            return Err(TaskError::version("new version must not be empty"));
        }

        let previous = self.reader.read()?.version;
        log::debug!("Rewriting version {} -> {}", previous, new_version);

        let mut files = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let data = fs::read(target).map_err(|e| TaskError::io(target, e))?;
            let (output, count) =
                replace_bytes(&data, previous.as_bytes(), new_version.as_bytes());
            fs::write(target, output).map_err(|e| TaskError::io(target, e))?;

            if count == 0 {
                log::warn!(
                    "{} does not contain version {}; left unchanged",
                    target.display(),
                    previous
                );
            } else if count > 1 {
                log::warn!(
                    "{} contains version {} {} times; all occurrences replaced",
                    target.display(),
                    previous,
                    count
                );
            }
            files.push((target.clone(), count));
        }

        Ok(RewriteReport {
            previous,
            current: new_version.to_string(),
            files,
        })
    }
}

/// Replaces every non-overlapping occurrence of `from`, scanning left to right.
fn replace_bytes(data: &[u8], from: &[u8], to: &[u8]) -> (Vec<u8>, usize) {
    if from.is_empty() {
        return (data.to_vec(), 0);
    }

    let mut output = Vec::with_capacity(data.len());
    let mut count = 0;
    let mut rest = data;
    while let Some(&byte) = rest.first() {
        if rest.starts_with(from) {
            output.extend_from_slice(to);
            rest = &rest[from.len()..];
            count += 1;
        } else {
            output.push(byte);
            rest = &rest[1..];
        }
    }

    (output, count)
}
