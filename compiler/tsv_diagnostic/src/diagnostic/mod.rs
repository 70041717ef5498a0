use std::fmt;

use serde::Serialize;

use crate::DiagnosticCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Message,
}

impl Severity {
    /// Parse the category word `tsc` prints before the code.
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "message" | "suggestion" => Some(Severity::Message),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Message => write!(f, "message"),
        }
    }
}

/// A 1-based source position.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct Location {
    pub line: u32,
    /// Column is optional: some front ends only report lines.
    pub column: Option<u32>,
}

impl Location {
    pub fn new(line: u32, column: Option<u32>) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(col) => write!(f, "{}:{col}", self.line),
            None => write!(f, "{}", self.line),
        }
    }
}

/// A message reported by a type-checking front end for one line of one fragment.
///
/// Diagnostics are recomputed on every run and never persisted.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct Diagnostic {
    pub location: Location,
    pub severity: Severity,
    pub code: Option<DiagnosticCode>,
    /// Full message text. Multi-line elaborations are joined with `\n`.
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic with no code.
    pub fn error(line: u32, column: Option<u32>, message: impl Into<String>) -> Self {
        Diagnostic {
            location: Location::new(line, column),
            severity: Severity::Error,
            code: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.location.line
    }

    #[inline]
    pub fn column(&self) -> Option<u32> {
        self.location.column
    }

    /// First line of the message (the headline, without elaboration).
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(
                f,
                "[{code}] at {}: {}",
                self.location,
                self.headline()
            ),
            None => write!(f, "at {}: {}", self.location, self.headline()),
        }
    }
}
