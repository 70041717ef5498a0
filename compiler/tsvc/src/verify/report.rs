//! Verdicts and corpus-wide aggregation.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tsv_diagnostic::Diagnostic;

use super::matching::{FragmentMatch, MarkerMatch, MatchStatus};

/// Classification of one fragment after matching.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Every marker matched and nothing unexpected was reported.
    Pass,
    /// A marker was missing or mismatched, or an unexpected error appeared.
    Fail,
    /// The fragment could not be verified (malformed markers, adapter failure).
    Fatal,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
            Verdict::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Everything known about one fragment after verification.
#[derive(Clone, Debug)]
pub struct FragmentReport {
    pub path: PathBuf,
    pub verdict: Verdict,
    /// One entry per well-formed marker, in line order.
    pub results: Vec<MarkerMatch>,
    /// Diagnostics no marker accounted for.
    pub unexpected: Vec<Diagnostic>,
    /// Reasons the fragment is fatal.
    pub errors: Vec<String>,
    /// Listed in the expected-failure file.
    pub expected_failure: bool,
    pub duration: Duration,
}

impl FragmentReport {
    /// Build a report from a completed match plus any fatal errors.
    ///
    /// Fatal errors win over match results: a fragment with a malformed
    /// marker is fatal even if every other marker matched.
    pub fn from_match(path: PathBuf, matched: FragmentMatch, errors: Vec<String>) -> Self {
        let verdict = if !errors.is_empty() {
            Verdict::Fatal
        } else if matched.is_success() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        FragmentReport {
            path,
            verdict,
            results: matched.results,
            unexpected: matched.unexpected,
            errors,
            expected_failure: false,
            duration: Duration::ZERO,
        }
    }

    /// Report for a fragment that could not be verified at all.
    #[cold]
    pub fn fatal(path: PathBuf, errors: Vec<String>) -> Self {
        FragmentReport {
            path,
            verdict: Verdict::Fatal,
            results: Vec::new(),
            unexpected: Vec::new(),
            errors,
            expected_failure: false,
            duration: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Markers that were missing or mismatched.
    pub fn mismatches(&self) -> impl Iterator<Item = &MarkerMatch> {
        self.results.iter().filter(|r| r.status != MatchStatus::Matched)
    }
}

/// Summary of a whole corpus run, in input order.
#[derive(Clone, Debug, Default)]
pub struct Report {
    pub fragments: Vec<FragmentReport>,
    pub passed: usize,
    pub failed: usize,
    pub fatal: usize,
    /// Listed as expected failures and did not pass. Also counted in
    /// `failed` or `fatal`.
    pub expected_failures: usize,
    /// Listed as expected failures but passed (stale entries). Also counted
    /// in `passed`.
    pub unexpected_passes: usize,
    pub duration: Duration,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    /// Aggregate results that may have completed in any order.
    ///
    /// Each result is keyed by its position in the input fragment list; the
    /// report is rendered in that order.
    pub fn collect(mut indexed: Vec<(usize, FragmentReport)>) -> Self {
        indexed.sort_by_key(|(index, _)| *index);
        let mut report = Report::new();
        for (_, fragment) in indexed {
            report.add_fragment(fragment);
        }
        report
    }

    pub fn add_fragment(&mut self, fragment: FragmentReport) {
        match fragment.verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail => self.failed += 1,
            Verdict::Fatal => self.fatal += 1,
        }
        if fragment.expected_failure {
            if fragment.verdict.is_pass() {
                self.unexpected_passes += 1;
            } else {
                self.expected_failures += 1;
            }
        }
        self.fragments.push(fragment);
    }

    pub fn total(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if any fragment failed or was fatal, listed or not.
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.fatal > 0
    }

    /// Get exit code: 0 = all pass, 1 = failures, 2 = no fragments found.
    pub fn exit_code(&self) -> i32 {
        if self.total() == 0 {
            2
        } else {
            i32::from(self.has_failures())
        }
    }
}
