//! Diagnostic codes as reported by `tsc` (e.g., `TS2322`).

use std::fmt;

use serde::Serialize;

/// A numeric diagnostic code with a tool prefix.
///
/// `tsc` prints codes as `TS` followed by a number. The number identifies
/// the message template, so `TS2322` is always "Type 'X' is not assignable
/// to type 'Y'" regardless of the types involved.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
#[serde(into = "String")]
pub struct DiagnosticCode(u32);

impl DiagnosticCode {
    pub const fn new(number: u32) -> Self {
        DiagnosticCode(number)
    }

    /// Parse a code of the form `TS1234`.
    ///
    /// Returns `None` for anything else, including a bare number.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix("TS")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(DiagnosticCode)
    }

    pub fn number(self) -> u32 {
        self.0
    }

    /// Codes in the 5000 range are compiler option errors, not errors in
    /// the checked source.
    pub fn is_option_error(self) -> bool {
        (5000..6000).contains(&self.0)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TS{}", self.0)
    }
}

impl From<DiagnosticCode> for String {
    fn from(code: DiagnosticCode) -> Self {
        code.to_string()
    }
}
