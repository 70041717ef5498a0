//! Expected-error marker extraction.
//!
//! A marker is a line comment whose body starts with a run of tildes:
//!
//! ```text
//! const id: number = product.id;
//!    // ~~ Type 'string' is not assignable to type 'number'
//! ```
//!
//! The tildes point at the offending text on the nearest code line above;
//! the rest of the comment is the expected diagnostic text, kept verbatim
//! (trimmed). Several markers stacked under one code line all anchor to it.
//!
//! A marker with nothing to anchor to, or with no message, is malformed. It
//! is skipped and reported so the caller can mark the fragment fatal.

use std::fmt;
use std::path::PathBuf;

use crate::fragment::Fragment;

/// An assertion that a diagnostic is expected on a specific line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectedMarker {
    /// Fragment the marker was found in.
    pub path: PathBuf,
    /// Anchored (annotated) line, 1-based.
    pub line: u32,
    /// Line the marker comment itself is on.
    pub marker_line: u32,
    /// 1-based column of the first `~`.
    pub column: Option<u32>,
    /// Number of `~` characters.
    pub width: u32,
    /// Expected diagnostic text.
    pub expected: String,
}

impl fmt::Display for ExpectedMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(col) => write!(f, "line {}:{col} expects '{}'", self.line, self.expected),
            None => write!(f, "line {} expects '{}'", self.line, self.expected),
        }
    }
}

/// Why a marker comment could not be used.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarkerErrorKind {
    #[error("marker has no expected message")]
    EmptyMessage,
    #[error("marker does not follow a code line")]
    NoAnchor,
}

/// A malformed marker comment.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed marker at line {line}: {kind}")]
pub struct MarkerParseError {
    pub line: u32,
    pub kind: MarkerErrorKind,
}

/// Markers found in one fragment, in line order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkerSet {
    pub markers: Vec<ExpectedMarker>,
    pub errors: Vec<MarkerParseError>,
}

impl MarkerSet {
    /// Whether any marker comment was malformed.
    pub fn is_malformed(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Comment,
    Code,
    Marker {
        column: u32,
        width: u32,
        text: &'a str,
    },
}

/// Extract the expected-error markers of a fragment.
///
/// A fragment without markers yields an empty set; that is a fragment
/// demonstrating code that should compile cleanly.
pub fn extract_markers(fragment: &Fragment) -> MarkerSet {
    let mut set = MarkerSet::default();
    let mut in_block = false;
    let mut anchor: Option<u32> = None;

    for (number, line) in fragment.lines() {
        match classify(line, &mut in_block) {
            LineKind::Blank | LineKind::Comment => anchor = None,
            LineKind::Code => anchor = Some(number),
            LineKind::Marker {
                column,
                width,
                text,
            } => {
                let Some(anchor_line) = anchor else {
                    set.errors.push(MarkerParseError {
                        line: number,
                        kind: MarkerErrorKind::NoAnchor,
                    });
                    continue;
                };
                if text.is_empty() {
                    set.errors.push(MarkerParseError {
                        line: number,
                        kind: MarkerErrorKind::EmptyMessage,
                    });
                    continue;
                }
                set.markers.push(ExpectedMarker {
                    path: fragment.path().to_path_buf(),
                    line: anchor_line,
                    marker_line: number,
                    column: Some(column),
                    width,
                    expected: text.to_string(),
                });
            }
        }
    }

    tracing::trace!(
        path = %fragment.path().display(),
        markers = set.markers.len(),
        malformed = set.errors.len(),
        "extracted markers"
    );
    set
}

fn classify<'a>(line: &'a str, in_block: &mut bool) -> LineKind<'a> {
    let mut rest = line;

    if *in_block {
        let Some(end) = rest.find("*/") else {
            return LineKind::Comment;
        };
        *in_block = false;
        rest = &rest[end + 2..];
        if rest.trim().is_empty() {
            return LineKind::Comment;
        }
    }

    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if let Some(body) = trimmed.strip_prefix("//") {
        let after = body.trim_start();
        if !after.starts_with('~') {
            return LineKind::Comment;
        }
        let tildes = after.len() - after.trim_start_matches('~').len();
        let tilde_offset = line.len() - after.len();
        let column = char_column(line, tilde_offset);
        return LineKind::Marker {
            column,
            width: u32::try_from(tildes).unwrap_or(u32::MAX),
            text: after[tildes..].trim(),
        };
    }

    if let Some(body) = trimmed.strip_prefix("/*") {
        let Some(end) = body.find("*/") else {
            *in_block = true;
            return LineKind::Comment;
        };
        let after = body[end + 2..].trim();
        if after.is_empty() || after.starts_with("//") {
            return LineKind::Comment;
        }
        if opens_block_comment(after) {
            *in_block = true;
        }
        return LineKind::Code;
    }

    if opens_block_comment(rest) {
        *in_block = true;
    }
    LineKind::Code
}

/// 1-based character column of a byte offset within `line`.
fn char_column(line: &str, byte_offset: usize) -> u32 {
    let chars = line[..byte_offset].chars().count();
    u32::try_from(chars).unwrap_or(u32::MAX - 1) + 1
}

/// Whether a code line leaves a `/*` comment open at its end.
///
/// Skips string literals and stops at a trailing `//` comment.
fn opens_block_comment(code: &str) -> bool {
    let mut chars = code.chars().peekable();
    let mut quote: Option<char> = None;
    let mut in_comment = false;

    while let Some(c) = chars.next() {
        if in_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_comment = false;
            }
            continue;
        }
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '/' if chars.peek() == Some(&'/') => return false,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_comment = true;
            }
            _ => {}
        }
    }

    in_comment
}
