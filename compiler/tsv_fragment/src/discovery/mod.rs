//! Fragment discovery.
//!
//! Walks a corpus tree for fragment files. Every `.ts`, `.tsx`, `.mts` and
//! `.cts` file is a fragment, except declaration files (`.d.ts`), which are
//! only ever shared context.
//!
//! Hidden entries and build/dependency directories are skipped. Anything
//! else that cannot be read is recorded as a [`DiscoveryError`] rather than
//! dropped, so a corpus with an unreadable chapter never looks clean.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "dist"];

/// A discovered fragment file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentPath {
    pub path: PathBuf,
}

impl FragmentPath {
    pub fn new(path: PathBuf) -> Self {
        FragmentPath { path }
    }
}

/// A part of the corpus tree that could not be read.
#[derive(Debug, thiserror::Error)]
#[error("cannot read `{}`: {source}", .path.display())]
pub struct DiscoveryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Outcome of walking a corpus.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Fragments found, sorted by path.
    pub fragments: Vec<FragmentPath>,
    /// Unreadable directories and fragment entries, sorted by path.
    pub errors: Vec<DiscoveryError>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.errors.is_empty()
    }
}

/// Discover all fragment files under `root`.
pub fn discover_fragments(root: &Path) -> Discovery {
    let mut discovery = Discovery::default();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) => {
                discovery.errors.push(DiscoveryError { path: dir, source });
                continue;
            }
        };
        for entry in entries {
            match entry {
                Ok(entry) => visit(&entry.path(), &mut pending, &mut discovery),
                Err(source) => discovery.errors.push(DiscoveryError {
                    path: dir.clone(),
                    source,
                }),
            }
        }
    }

    discovery.fragments.sort_by(|a, b| a.path.cmp(&b.path));
    discovery.errors.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(
        root = %root.display(),
        count = discovery.fragments.len(),
        errors = discovery.errors.len(),
        "discovered fragments"
    );
    discovery
}

fn visit(path: &Path, pending: &mut Vec<PathBuf>, discovery: &mut Discovery) {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return;
    };
    if name.starts_with('.') {
        return;
    }

    // Follows symlinks; a dangling link only matters if it names a fragment.
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            if SKIPPED_DIRS.contains(&name) {
                tracing::trace!(dir = %path.display(), "skipped directory");
            } else {
                pending.push(path.to_path_buf());
            }
        }
        Ok(_) => {
            if is_fragment_path(path) {
                discovery.fragments.push(FragmentPath::new(path.to_path_buf()));
            }
        }
        Err(source) if is_fragment_path(path) => discovery.errors.push(DiscoveryError {
            path: path.to_path_buf(),
            source,
        }),
        Err(_) => {}
    }
}

/// Whether `path` names a fragment file (by extension).
pub fn is_fragment_path(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e, "ts" | "tsx" | "mts" | "cts"))
}

/// Discover fragments in a specific file or directory.
///
/// A fragment file yields just itself; any other file, or a path that does
/// not exist, yields nothing.
pub fn discover_fragments_in(path: &Path) -> Discovery {
    if path.is_dir() {
        return discover_fragments(path);
    }
    let mut discovery = Discovery::default();
    if path.is_file() && is_fragment_path(path) {
        discovery.fragments.push(FragmentPath::new(path.to_path_buf()));
    }
    discovery
}
