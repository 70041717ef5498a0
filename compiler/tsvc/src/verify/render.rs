//! Report rendering: human-readable text and machine-readable JSON.
//!
//! Neither format includes timings unless asked to, so two runs over an
//! unchanged corpus render identically.

use std::fmt::{self, Write};

use serde::Serialize;
use tsv_diagnostic::Diagnostic;

use super::matching::MatchStatus;
use super::report::{FragmentReport, Report, Verdict};

/// Render a report as text, one block per fragment needing attention.
///
/// With `verbose`, passing fragments and durations are listed too.
pub fn render_text(report: &Report, verbose: bool) -> String {
    let mut out = String::new();
    let _ = write_text(&mut out, report, verbose);
    out
}

/// Write the text rendering of a report.
pub fn write_text(out: &mut impl Write, report: &Report, verbose: bool) -> fmt::Result {
    for fragment in &report.fragments {
        write_fragment(out, fragment, verbose)?;
    }

    writeln!(out)?;
    writeln!(out, "Fragment Summary:")?;
    writeln!(
        out,
        "  {} passed, {} failed, {} fatal ({} total)",
        report.passed,
        report.failed,
        report.fatal,
        report.total()
    )?;
    if report.expected_failures > 0 || report.unexpected_passes > 0 {
        writeln!(
            out,
            "  xfail: {} failed as expected, {} passed unexpectedly",
            report.expected_failures, report.unexpected_passes
        )?;
    }
    if verbose {
        writeln!(out, "  Completed in {:.2?}", report.duration)?;
    }

    writeln!(out)?;
    if report.has_failures() {
        writeln!(out, "FAILED")
    } else if report.total() == 0 {
        writeln!(out, "NO FRAGMENTS FOUND")
    } else {
        writeln!(out, "OK")
    }
}

fn write_fragment(out: &mut impl Write, fragment: &FragmentReport, verbose: bool) -> fmt::Result {
    let path = fragment.path.display();
    let tag = match (fragment.expected_failure, fragment.verdict) {
        (true, Verdict::Pass) => "XPASS",
        (true, _) => "XFAIL",
        (false, Verdict::Pass) if verbose => "PASS",
        (false, Verdict::Pass) => return Ok(()),
        (false, Verdict::Fail) => "FAIL",
        (false, Verdict::Fatal) => "FATAL",
    };
    if verbose {
        writeln!(out, "{tag}: {path} ({:.2?})", fragment.duration)?;
    } else {
        writeln!(out, "{tag}: {path}")?;
    }
    if fragment.verdict.is_pass() {
        return Ok(());
    }

    for error in &fragment.errors {
        writeln!(out, "  ERROR: {error}")?;
    }
    for result in fragment.mismatches() {
        let marker = &result.marker;
        match (&result.status, &result.actual) {
            (MatchStatus::Mismatched, Some(actual)) => {
                writeln!(out, "  MISMATCH: {marker}")?;
                writeln!(out, "    actual: {actual}")?;
            }
            _ => writeln!(out, "  MISSING: {marker}")?,
        }
    }
    for diagnostic in &fragment.unexpected {
        writeln!(out, "  UNEXPECTED: {diagnostic}")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    fragments: Vec<JsonFragment<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonFragment<'a> {
    path: String,
    verdict: Verdict,
    expected_failure: bool,
    mismatches: Vec<JsonMismatch<'a>>,
    unexpected: &'a [Diagnostic],
    errors: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u128>,
}

#[derive(Serialize)]
struct JsonMismatch<'a> {
    line: u32,
    column: Option<u32>,
    expected: &'a str,
    status: MatchStatus,
    actual: Option<&'a Diagnostic>,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    passed: usize,
    failed: usize,
    fatal: usize,
    expected_failures: usize,
    unexpected_passes: usize,
    exit_code: i32,
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &Report, verbose: bool) -> Result<String, serde_json::Error> {
    let fragments = report
        .fragments
        .iter()
        .map(|fragment| JsonFragment {
            path: fragment.path.display().to_string(),
            verdict: fragment.verdict,
            expected_failure: fragment.expected_failure,
            mismatches: fragment
                .mismatches()
                .map(|result| JsonMismatch {
                    line: result.marker.line,
                    column: result.marker.column,
                    expected: &result.marker.expected,
                    status: result.status,
                    actual: result.actual.as_ref(),
                })
                .collect(),
            unexpected: &fragment.unexpected,
            errors: &fragment.errors,
            duration_ms: verbose.then(|| fragment.duration.as_millis()),
        })
        .collect();

    let json = JsonReport {
        fragments,
        summary: JsonSummary {
            total: report.total(),
            passed: report.passed,
            failed: report.failed,
            fatal: report.fatal,
            expected_failures: report.expected_failures,
            unexpected_passes: report.unexpected_passes,
            exit_code: report.exit_code(),
        },
    };
    serde_json::to_string_pretty(&json)
}
