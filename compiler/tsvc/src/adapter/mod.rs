//! Compiler adapters: text in, diagnostics out.
//!
//! The verifier never type checks anything itself. It hands each fragment to
//! a [`TypeChecker`] together with the options for that fragment and the
//! explicitly declared [`SharedContext`], and gets back the diagnostics for
//! that fragment alone.
//!
//! An adapter that cannot produce diagnostics must say so with an
//! [`AdapterError`]; an empty `Ok` means the fragment compiled cleanly.

mod tsc;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tsv_diagnostic::Diagnostic;
use tsv_fragment::{CheckOptions, Fragment};

pub use tsc::TscChecker;

/// Reasons an adapter produced no usable diagnostics for a fragment.
///
/// Every variant makes the fragment's verdict fatal.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while checking fragment: {0}")]
    Io(#[from] std::io::Error),

    #[error("type checker timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("type checker crashed ({status}): {stderr}")]
    Crashed { status: String, stderr: String },

    #[error("type checker exited with {status} but reported no diagnostics")]
    NoDiagnostics { status: String },

    #[error("type checker configuration error: {message}")]
    Configuration { message: String },

    #[error("diagnostic outside the fragment in `{file}`: {message}")]
    OutsideFragment { file: String, message: String },
}

/// A type-checking front end invoked through a stable query interface.
///
/// Implementations must isolate each call: nothing from one fragment may be
/// visible while checking another, except what `shared` declares.
pub trait TypeChecker: Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Type check one fragment in isolation.
    fn check(
        &self,
        fragment: &Fragment,
        options: &CheckOptions,
        shared: &SharedContext,
    ) -> Result<Vec<Diagnostic>, AdapterError>;
}

/// Errors loading shared context files.
#[derive(Debug, thiserror::Error)]
pub enum SharedContextError {
    #[error("failed to read shared context `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("two shared context files are named `{0}`")]
    DuplicateName(String),

    #[error("shared context path `{}` has no file name", .0.display())]
    NoFileName(PathBuf),
}

/// A declaration file made visible to every fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedFile {
    /// File name the checker sees (e.g., `globals.d.ts`).
    pub name: String,
    pub text: String,
}

/// Ambient declarations shared across fragments.
///
/// Always passed explicitly to [`TypeChecker::check`]; there is no
/// process-wide ambient state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SharedContext {
    files: Vec<SharedFile>,
}

impl SharedContext {
    pub fn empty() -> Self {
        SharedContext::default()
    }

    /// Build a context from in-memory files.
    pub fn from_files(files: Vec<SharedFile>) -> Result<Self, SharedContextError> {
        let mut context = SharedContext::empty();
        for file in files {
            context.push(file)?;
        }
        Ok(context)
    }

    /// Read shared declaration files from disk.
    pub fn load(paths: &[PathBuf]) -> Result<Self, SharedContextError> {
        let mut context = SharedContext::empty();
        for path in paths {
            let name = file_name(path)?;
            let text = std::fs::read_to_string(path).map_err(|source| SharedContextError::Read {
                path: path.clone(),
                source,
            })?;
            context.push(SharedFile { name, text })?;
        }
        Ok(context)
    }

    fn push(&mut self, file: SharedFile) -> Result<(), SharedContextError> {
        if self.files.iter().any(|f| f.name == file.name) {
            return Err(SharedContextError::DuplicateName(file.name));
        }
        self.files.push(file);
        Ok(())
    }

    pub fn files(&self) -> &[SharedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn file_name(path: &Path) -> Result<String, SharedContextError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| SharedContextError::NoFileName(path.to_path_buf()))
}
