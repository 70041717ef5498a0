//! Loaded fragment source.

use std::path::{Path, PathBuf};

use crate::directives::{parse_directives, CheckOptions};

/// Errors loading a fragment from disk.
#[derive(Debug, thiserror::Error)]
pub enum FragmentError {
    #[error("failed to read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One self-contained source sample under test.
///
/// Immutable once loaded. Lines are 1-based and exclude the line terminator
/// (`\n` or `\r\n`).
#[derive(Clone, Debug)]
pub struct Fragment {
    path: PathBuf,
    text: String,
    /// Byte ranges of each line within `text`.
    lines: Vec<(usize, usize)>,
    options: CheckOptions,
}

impl Fragment {
    /// Build a fragment from in-memory text.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = line_ranges(&text);
        let options = parse_directives(&text);
        Fragment {
            path: path.into(),
            text,
            lines,
            options,
        }
    }

    /// Read a fragment from disk (UTF-8).
    pub fn load(path: &Path) -> Result<Self, FragmentError> {
        let text = std::fs::read_to_string(path).map_err(|source| FragmentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Fragment::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Compiler options declared by the fragment's own directives.
    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by 1-based number.
    pub fn line(&self, number: u32) -> Option<&str> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        self.lines
            .get(idx)
            .map(|&(start, end)| &self.text[start..end])
    }

    /// Iterate `(line_number, text)` pairs in order.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.lines.iter().enumerate().map(|(idx, &(start, end))| {
            let number = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            (number, &self.text[start..end])
        })
    }
}

fn line_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (i, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            let end = if i > start && text.as_bytes()[i - 1] == b'\r' {
                i - 1
            } else {
                i
            };
            ranges.push((start, end));
            start = i + 1;
        }
    }
    if start < text.len() {
        ranges.push((start, text.len()));
    }
    ranges
}
