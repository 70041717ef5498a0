//! Parser for `tsc --pretty false` output.
//!
//! Each diagnostic starts on an unindented line:
//!
//! ```text
//! sample.ts(9,9): error TS2322: Type 'string' is not assignable to type 'number'.
//! error TS5023: Unknown compiler option 'bogus'.
//! ```
//!
//! Elaboration chains follow on indented lines and belong to the diagnostic
//! above them. Anything else (banners, blank lines) is collected as
//! unrecognized so callers can log it.

use std::path::PathBuf;

use crate::{Diagnostic, DiagnosticCode, Location, Severity};

/// One diagnostic from `tsc` output.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum TscEntry {
    /// Diagnostic reported against a file position.
    Located { file: PathBuf, diagnostic: Diagnostic },
    /// Diagnostic with no file (option and configuration errors).
    Global {
        severity: Severity,
        code: Option<DiagnosticCode>,
        message: String,
    },
}

impl TscEntry {
    fn message_mut(&mut self) -> &mut String {
        match self {
            TscEntry::Located { diagnostic, .. } => &mut diagnostic.message,
            TscEntry::Global { message, .. } => message,
        }
    }
}

/// Parsed `tsc` output.
#[derive(Clone, Debug, Default)]
pub struct TscOutput {
    pub entries: Vec<TscEntry>,
    pub unrecognized: Vec<String>,
}

impl TscOutput {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the full stdout of a `tsc --pretty false` run.
pub fn parse_output(output: &str) -> TscOutput {
    let mut parsed = TscOutput::default();

    for line in output.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            if let Some(last) = parsed.entries.last_mut() {
                let message = last.message_mut();
                message.push('\n');
                message.push_str(line);
            } else {
                parsed.unrecognized.push(line.to_string());
            }
            continue;
        }

        match parse_line(line) {
            Some(entry) => parsed.entries.push(entry),
            None => parsed.unrecognized.push(line.to_string()),
        }
    }

    parsed
}

/// Parse one unindented diagnostic line.
pub fn parse_line(line: &str) -> Option<TscEntry> {
    if let Some((file, location, rest)) = split_location(line) {
        let (severity, code, message) = parse_body(rest)?;
        let diagnostic = Diagnostic {
            location,
            severity,
            code,
            message: message.to_string(),
        };
        return Some(TscEntry::Located {
            file: PathBuf::from(file),
            diagnostic,
        });
    }

    let (severity, code, message) = parse_body(line)?;
    Some(TscEntry::Global {
        severity,
        code,
        message: message.to_string(),
    })
}

/// Split `path(line,col): rest` into its parts.
///
/// Paths may themselves contain parentheses, so every `"): "` is tried and
/// the first one preceded by a well-formed `(line,col` wins.
fn split_location(line: &str) -> Option<(&str, Location, &str)> {
    let mut search_from = 0;
    while let Some(rel) = line[search_from..].find("): ") {
        let close = search_from + rel;
        if let Some(open) = line[..close].rfind('(') {
            if let Some(location) = parse_position(&line[open + 1..close]) {
                if open > 0 {
                    return Some((&line[..open], location, &line[close + 3..]));
                }
            }
        }
        search_from = close + 3;
    }
    None
}

fn parse_position(text: &str) -> Option<Location> {
    let (line, col) = match text.split_once(',') {
        Some((line, col)) => (line, Some(col)),
        None => (text, None),
    };
    let line: u32 = line.trim().parse().ok()?;
    let column = match col {
        Some(col) => Some(col.trim().parse().ok()?),
        None => None,
    };
    Some(Location::new(line, column))
}

/// Parse `error TS2322: message`.
fn parse_body(text: &str) -> Option<(Severity, Option<DiagnosticCode>, &str)> {
    let (word, rest) = text.split_once(' ')?;
    let severity = Severity::parse(word)?;
    match rest.split_once(": ") {
        Some((code, message)) if code.starts_with("TS") => {
            Some((severity, DiagnosticCode::parse(code), message))
        }
        _ => Some((severity, None, rest.strip_prefix(": ").unwrap_or(rest))),
    }
}

#[cfg(test)]
mod tests;
