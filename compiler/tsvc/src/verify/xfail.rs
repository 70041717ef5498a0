//! Expected failure (XFAIL) tracking for fragments with known gaps.
//!
//! The list only relabels: a listed fragment that fails is shown as XFAIL
//! but still counts as a failure for the exit code. Listed fragments that
//! pass are reported as XPASS so stale entries get removed. Nothing is
//! loaded unless a list is named explicitly.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Errors reading an explicitly requested xfail file.
#[derive(Debug, thiserror::Error)]
#[error("failed to read expected-failure list `{}`: {source}", .path.display())]
pub struct XFailError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Set of fragments expected to fail.
#[derive(Debug, Default)]
pub struct XFailSet {
    /// Fragment paths, joined onto the directory holding the list.
    files: HashSet<PathBuf>,
}

impl XFailSet {
    /// Create an empty set (no expected failures).
    pub fn empty() -> Self {
        XFailSet::default()
    }

    /// Read a list file. A missing file is an error.
    pub fn from_file(path: &Path) -> Result<Self, XFailError> {
        let content = std::fs::read_to_string(path).map_err(|source| XFailError {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded expected-failure list");
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self::parse(&content, base))
    }

    /// Parse list content.
    ///
    /// Format:
    /// - Lines starting with `#` are comments
    /// - Blank lines are ignored
    /// - Every other line is a fragment path relative to `base`
    pub fn parse(content: &str, base: &Path) -> Self {
        let files = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| base.join(line))
            .collect();
        XFailSet { files }
    }

    /// Check if a fragment is expected to fail.
    ///
    /// Compares canonicalized paths to handle relative/absolute differences.
    pub fn is_expected(&self, fragment: &Path) -> bool {
        if self.files.contains(fragment) {
            return true;
        }
        if let Ok(canonical) = fragment.canonicalize() {
            self.files.iter().any(|expected| {
                expected
                    .canonicalize()
                    .is_ok_and(|exp_canonical| exp_canonical == canonical)
            })
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
