//! Mock type checker for controlled testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tsv_diagnostic::{Diagnostic, DiagnosticCode};
use tsv_fragment::{CheckOptions, Fragment};

use crate::adapter::{AdapterError, SharedContext, TypeChecker};

/// What the fake reports for one fragment, keyed by file name.
#[derive(Clone, Debug)]
pub enum FakeOutcome {
    Diagnostics(Vec<Diagnostic>),
    Timeout(Duration),
    Crash(String),
}

/// A line-pattern rule: every fragment line containing `pattern` gets one
/// diagnostic with `message`, at the column where the pattern starts.
#[derive(Clone, Debug)]
struct Rule {
    pattern: String,
    code: Option<DiagnosticCode>,
    message: String,
}

/// Scripted [`TypeChecker`].
///
/// Fragments with a scripted outcome get exactly that; all others get the
/// diagnostics produced by the line rules (none if there are no rules).
#[derive(Debug, Default)]
pub struct FakeChecker {
    outcomes: HashMap<String, FakeOutcome>,
    rules: Vec<Rule>,
    calls: AtomicUsize,
}

impl FakeChecker {
    pub fn new() -> Self {
        FakeChecker::default()
    }

    /// Report a diagnostic on every line containing `pattern`.
    #[must_use]
    pub fn with_rule(mut self, pattern: &str, message: &str) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            code: None,
            message: message.to_string(),
        });
        self
    }

    /// Like [`FakeChecker::with_rule`], tagging diagnostics with a code.
    #[must_use]
    pub fn with_coded_rule(mut self, pattern: &str, code: u32, message: &str) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            code: Some(DiagnosticCode::new(code)),
            message: message.to_string(),
        });
        self
    }

    /// Fix the outcome for fragments with this file name.
    #[must_use]
    pub fn with_outcome(mut self, file_name: &str, outcome: FakeOutcome) -> Self {
        self.outcomes.insert(file_name.to_string(), outcome);
        self
    }

    #[must_use]
    pub fn with_diagnostics(self, file_name: &str, diagnostics: Vec<Diagnostic>) -> Self {
        self.with_outcome(file_name, FakeOutcome::Diagnostics(diagnostics))
    }

    /// Number of `check` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn apply_rules(&self, fragment: &Fragment) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (number, line) in fragment.lines() {
            if line.trim_start().starts_with("//") {
                continue;
            }
            for rule in &self.rules {
                if let Some(offset) = line.find(&rule.pattern) {
                    let column = u32::try_from(line[..offset].chars().count() + 1).unwrap_or(1);
                    let mut diagnostic = Diagnostic::error(number, Some(column), &rule.message);
                    if let Some(code) = rule.code {
                        diagnostic = diagnostic.with_code(code);
                    }
                    diagnostics.push(diagnostic);
                }
            }
        }
        diagnostics
    }
}

impl TypeChecker for FakeChecker {
    fn name(&self) -> &str {
        "fake"
    }

    fn check(
        &self,
        fragment: &Fragment,
        _options: &CheckOptions,
        _shared: &SharedContext,
    ) -> Result<Vec<Diagnostic>, AdapterError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let name = fragment
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.outcomes.get(&name) {
            Some(FakeOutcome::Diagnostics(diagnostics)) => Ok(diagnostics.clone()),
            Some(FakeOutcome::Timeout(after)) => Err(AdapterError::Timeout(*after)),
            Some(FakeOutcome::Crash(stderr)) => Err(AdapterError::Crashed {
                status: "exit status: 134".to_string(),
                stderr: stderr.clone(),
            }),
            None => Ok(self.apply_rules(fragment)),
        }
    }
}
