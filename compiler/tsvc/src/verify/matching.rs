//! Pairing expected markers with actual diagnostics.
//!
//! For each marker, in line order:
//!
//! 1. Look for unconsumed diagnostics whose message satisfies the marker on
//!    the anchor line; failing that, on the nearest preceding line within the
//!    tolerance window (errors in multi-line expressions are often reported
//!    where the expression starts).
//! 2. Among candidates on that line, take the one sharing the longest common
//!    substring with the expectation, then the one closest to the tilde
//!    column, then the earliest reported.
//! 3. Consume it, so one diagnostic never satisfies two markers.
//!
//! Once every marker has had its chance at a satisfying diagnostic, a marker
//! still unsatisfied is `Mismatched` when a leftover diagnostic sits in its
//! window (that diagnostic is consumed and shown as the actual), and
//! `Missing` otherwise. Diagnostics left over at the end are
//! unexpected errors.

use std::cmp::Reverse;
use std::fmt;

use serde::Serialize;
use tsv_diagnostic::Diagnostic;
use tsv_fragment::ExpectedMarker;

/// Text that separates segments of an elided expectation.
const ELLIPSIS: &str = "...";

/// How one marker fared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Matched,
    Missing,
    Mismatched,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "matched"),
            MatchStatus::Missing => write!(f, "missing"),
            MatchStatus::Mismatched => write!(f, "mismatched"),
        }
    }
}

/// One marker linked to zero or one diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerMatch {
    pub marker: ExpectedMarker,
    pub status: MatchStatus,
    pub actual: Option<Diagnostic>,
}

/// Result of matching all markers of one fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FragmentMatch {
    /// One entry per marker, in line order.
    pub results: Vec<MarkerMatch>,
    /// Diagnostics no marker accounted for, in reported order.
    pub unexpected: Vec<Diagnostic>,
}

impl FragmentMatch {
    /// Every marker matched and nothing unexpected was reported.
    pub fn is_success(&self) -> bool {
        self.unexpected.is_empty() && self.results.iter().all(|r| r.status == MatchStatus::Matched)
    }

    pub fn count(&self, status: MatchStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

/// Match a fragment's markers against its diagnostics.
///
/// `tolerance` is how many lines above the anchor a diagnostic may sit and
/// still count.
pub fn match_markers(
    markers: &[ExpectedMarker],
    diagnostics: Vec<Diagnostic>,
    tolerance: u32,
) -> FragmentMatch {
    let mut ordered: Vec<&ExpectedMarker> = markers.iter().collect();
    ordered.sort_by_key(|m| (m.line, m.marker_line));

    let mut consumed = vec![false; diagnostics.len()];

    // Satisfying matches first, for every marker.
    let mut chosen: Vec<Option<(MatchStatus, usize)>> = ordered
        .iter()
        .map(|marker| {
            let qualifying: Vec<usize> = window(marker, &diagnostics, &consumed, tolerance)
                .filter(|&i| message_matches(&diagnostics[i].message, &marker.expected))
                .collect();
            let i = best_candidate(marker, &diagnostics, &qualifying)?;
            consumed[i] = true;
            Some((MatchStatus::Matched, i))
        })
        .collect();

    // Leftovers in the window become the actual of an unsatisfied marker.
    for (marker, slot) in ordered.iter().zip(chosen.iter_mut()) {
        if slot.is_some() {
            continue;
        }
        let in_window: Vec<usize> = window(marker, &diagnostics, &consumed, tolerance).collect();
        if let Some(i) = best_candidate(marker, &diagnostics, &in_window) {
            consumed[i] = true;
            *slot = Some((MatchStatus::Mismatched, i));
        }
    }

    let results = ordered
        .into_iter()
        .zip(chosen)
        .map(|(marker, slot)| {
            let (status, actual) = match slot {
                Some((status, i)) => (status, Some(diagnostics[i].clone())),
                None => (MatchStatus::Missing, None),
            };
            tracing::trace!(
                line = marker.line,
                expected = %marker.expected,
                %status,
                "matched marker"
            );
            MarkerMatch {
                marker: marker.clone(),
                status,
                actual,
            }
        })
        .collect();

    let unexpected = diagnostics
        .into_iter()
        .zip(consumed)
        .filter_map(|(diag, used)| (!used).then_some(diag))
        .collect();

    FragmentMatch {
        results,
        unexpected,
    }
}

/// Unconsumed diagnostics between `tolerance` lines above the anchor and the anchor.
fn window<'a>(
    marker: &ExpectedMarker,
    diagnostics: &'a [Diagnostic],
    consumed: &'a [bool],
    tolerance: u32,
) -> impl Iterator<Item = usize> + 'a {
    let lines = marker.line.saturating_sub(tolerance)..=marker.line;
    (0..diagnostics.len()).filter(move |&i| !consumed[i] && lines.contains(&diagnostics[i].line()))
}

/// Pick the closest line first, then the best tie-break on that line.
fn best_candidate(
    marker: &ExpectedMarker,
    diagnostics: &[Diagnostic],
    candidates: &[usize],
) -> Option<usize> {
    let nearest_line = candidates.iter().map(|&i| diagnostics[i].line()).max()?;
    candidates
        .iter()
        .copied()
        .filter(|&i| diagnostics[i].line() == nearest_line)
        .min_by_key(|&i| {
            let diag = &diagnostics[i];
            (
                Reverse(longest_common_substring(&diag.message, &marker.expected)),
                column_distance(diag.column(), marker.column),
                i,
            )
        })
}

fn column_distance(actual: Option<u32>, expected: Option<u32>) -> u32 {
    match (actual, expected) {
        (Some(a), Some(e)) => a.abs_diff(e),
        _ => u32::MAX,
    }
}

/// Whether `message` satisfies an expectation.
///
/// Plain expectations are case-sensitive substrings. An expectation with
/// `...` matches when its segments appear in `message` in order.
pub fn message_matches(message: &str, expected: &str) -> bool {
    if !expected.contains(ELLIPSIS) {
        return message.contains(expected);
    }

    let mut rest = message;
    for segment in expected.split(ELLIPSIS).map(str::trim) {
        if segment.is_empty() {
            continue;
        }
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }
    true
}

/// Length in characters of the longest common substring of `a` and `b`.
pub fn longest_common_substring(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    let mut best = 0;
    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            best = best.max(curr[j + 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

#[cfg(test)]
mod tests;
