use super::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn marker(line: u32, column: Option<u32>, expected: &str) -> ExpectedMarker {
    ExpectedMarker {
        path: PathBuf::from("sample.ts"),
        line,
        marker_line: line + 1,
        column,
        width: 1,
        expected: expected.to_string(),
    }
}

fn diag(line: u32, column: u32, message: &str) -> Diagnostic {
    Diagnostic::error(line, Some(column), message)
}

const NOT_ASSIGNABLE: &str = "Type 'string' is not assignable to type 'number'.";

#[test]
fn test_nothing_expected_nothing_reported() {
    let result = match_markers(&[], vec![], 2);
    assert!(result.is_success());
    assert!(result.results.is_empty());
}

#[test]
fn test_exact_line_match() {
    let markers = [marker(1, Some(7), "Type 'string' is not assignable to type 'number'")];
    let result = match_markers(&markers, vec![diag(1, 7, NOT_ASSIGNABLE)], 2);

    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].status, MatchStatus::Matched);
    assert_eq!(result.results[0].actual, Some(diag(1, 7, NOT_ASSIGNABLE)));
    assert!(result.is_success());
}

#[test]
fn test_wrong_message_is_mismatched() {
    let markers = [marker(1, Some(7), "wrong message")];
    let result = match_markers(&markers, vec![diag(1, 7, NOT_ASSIGNABLE)], 2);

    assert_eq!(result.results[0].status, MatchStatus::Mismatched);
    assert_eq!(result.results[0].actual, Some(diag(1, 7, NOT_ASSIGNABLE)));
    // The mismatched diagnostic is accounted for, not also unexpected.
    assert!(result.unexpected.is_empty());
    assert!(!result.is_success());
}

#[test]
fn test_no_diagnostics_is_missing() {
    let markers = [marker(1, Some(7), "Type 'string'")];
    let result = match_markers(&markers, vec![], 2);

    assert_eq!(result.results[0].status, MatchStatus::Missing);
    assert_eq!(result.results[0].actual, None);
    assert!(!result.is_success());
}

#[test]
fn test_diagnostic_far_away_is_missing_and_unexpected() {
    let markers = [marker(10, None, "Type 'string'")];
    let result = match_markers(&markers, vec![diag(2, 1, NOT_ASSIGNABLE)], 2);

    assert_eq!(result.results[0].status, MatchStatus::Missing);
    assert_eq!(result.unexpected, vec![diag(2, 1, NOT_ASSIGNABLE)]);
}

#[test]
fn test_preceding_line_within_tolerance() {
    let markers = [marker(12, Some(5), "missing in type 'Bar'")];
    let reported = diag(
        11,
        3,
        "Property 'foo' is missing in type 'Bar' but required in type 'Foo'.",
    );
    let result = match_markers(&markers, vec![reported.clone()], 2);
    assert_eq!(result.results[0].status, MatchStatus::Matched);
    assert_eq!(result.results[0].actual, Some(reported.clone()));

    let strict = match_markers(&markers, vec![reported], 0);
    assert_eq!(strict.results[0].status, MatchStatus::Missing);
}

#[test]
fn test_diagnostic_after_anchor_does_not_count() {
    let markers = [marker(3, None, "Type 'string'")];
    let result = match_markers(&markers, vec![diag(4, 1, NOT_ASSIGNABLE)], 2);
    assert_eq!(result.results[0].status, MatchStatus::Missing);
    assert_eq!(result.unexpected.len(), 1);
}

#[test]
fn test_same_line_preferred_over_preceding() {
    let markers = [marker(5, None, "is not assignable")];
    let above = diag(4, 1, "Type 'A' is not assignable to type 'B'.");
    let same = diag(5, 1, "Type 'C' is not assignable to type 'D'.");
    let result = match_markers(&markers, vec![above.clone(), same.clone()], 2);

    assert_eq!(result.results[0].actual, Some(same));
    assert_eq!(result.unexpected, vec![above]);
}

#[test]
fn test_two_diagnostics_one_marker_best_match_wins() {
    let markers = [marker(1, Some(7), "Type 'string' is not assignable to type 'number'")];
    let weaker = diag(1, 7, "Type 'number' is not assignable to type 'never'.");
    let better = diag(1, 20, NOT_ASSIGNABLE);
    let result = match_markers(&markers, vec![weaker.clone(), better.clone()], 2);

    assert_eq!(result.results[0].status, MatchStatus::Matched);
    assert_eq!(result.results[0].actual, Some(better));
    assert_eq!(result.unexpected, vec![weaker]);
    assert!(!result.is_success());
}

#[test]
fn test_tie_broken_by_tilde_column() {
    let markers = [marker(2, Some(12), "Cannot find name")];
    let left = diag(2, 3, "Cannot find name 'a'.");
    let right = diag(2, 12, "Cannot find name 'b'.");
    let result = match_markers(&markers, vec![left.clone(), right.clone()], 2);

    assert_eq!(result.results[0].actual, Some(right));
    assert_eq!(result.unexpected, vec![left]);
}

#[test]
fn test_one_diagnostic_cannot_satisfy_two_markers() {
    let markers = [
        marker(1, None, "is not assignable"),
        marker(1, None, "is not assignable"),
    ];
    let result = match_markers(&markers, vec![diag(1, 1, NOT_ASSIGNABLE)], 2);

    assert_eq!(result.count(MatchStatus::Matched), 1);
    assert_eq!(result.count(MatchStatus::Missing), 1);
}

#[test]
fn test_stacked_markers_each_consume_one() {
    let markers = [
        marker(1, None, "Cannot find name 'a'"),
        marker(1, None, "Cannot find name 'b'"),
    ];
    let diagnostics = vec![
        diag(1, 9, "Cannot find name 'b'."),
        diag(1, 5, "Cannot find name 'a'."),
    ];
    let result = match_markers(&markers, diagnostics, 2);
    assert!(result.is_success());
}

#[test]
fn test_wrong_sibling_does_not_take_matching_diagnostic() {
    let markers = [
        marker(1, None, "wrong message"),
        marker(1, None, "Type 'string' is not assignable"),
    ];
    let result = match_markers(&markers, vec![diag(1, 7, NOT_ASSIGNABLE)], 2);

    let statuses: Vec<_> = result
        .results
        .iter()
        .map(|r| (r.marker.expected.as_str(), r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("wrong message", MatchStatus::Missing),
            ("Type 'string' is not assignable", MatchStatus::Matched),
        ]
    );
    assert_eq!(result.results[1].actual, Some(diag(1, 7, NOT_ASSIGNABLE)));
    assert!(result.unexpected.is_empty());
}

#[test]
fn test_leftover_diagnostic_goes_to_unsatisfied_sibling() {
    let markers = [
        marker(1, None, "wrong message"),
        marker(1, None, "Cannot find name 'a'"),
    ];
    let other = diag(1, 9, NOT_ASSIGNABLE);
    let diagnostics = vec![other.clone(), diag(1, 5, "Cannot find name 'a'.")];
    let result = match_markers(&markers, diagnostics, 2);

    assert_eq!(result.results[0].status, MatchStatus::Mismatched);
    assert_eq!(result.results[0].actual, Some(other));
    assert_eq!(result.results[1].status, MatchStatus::Matched);
    assert!(result.unexpected.is_empty());
}

#[test]
fn test_markers_processed_in_line_order() {
    let markers = [marker(5, None, "second"), marker(2, None, "first")];
    let result = match_markers(&markers, vec![], 2);
    let lines: Vec<_> = result.results.iter().map(|r| r.marker.line).collect();
    assert_eq!(lines, vec![2, 5]);
}

#[test]
fn test_matching_is_case_sensitive() {
    assert!(message_matches(NOT_ASSIGNABLE, "is not assignable"));
    assert!(!message_matches(NOT_ASSIGNABLE, "Is Not Assignable"));
}

#[test]
fn test_ellipsis_segments_in_order() {
    let message = "Property 'foo' is missing in type 'Bar' but required in type 'Foo'.";
    assert!(message_matches(
        message,
        "Property ... missing in type 'Bar' but required in type 'Foo'"
    ));
    assert!(!message_matches(message, "required in ... Property"));
    assert!(message_matches(message, "..."));
}

#[test]
fn test_longest_common_substring() {
    assert_eq!(longest_common_substring("abcdef", "zcdez"), 3);
    assert_eq!(longest_common_substring("", "abc"), 0);
    assert_eq!(longest_common_substring("same", "same"), 4);
    assert_eq!(longest_common_substring("αβγ", "βγδ"), 2);
}

#[test]
fn test_mismatch_reports_closest_message() {
    let markers = [marker(3, None, "Type 'string' is not assignable to type 'boolean'")];
    let unrelated = diag(3, 1, "Cannot find name 'x'.");
    let close = diag(3, 9, NOT_ASSIGNABLE);
    let result = match_markers(&markers, vec![unrelated.clone(), close.clone()], 2);

    assert_eq!(result.results[0].status, MatchStatus::Mismatched);
    assert_eq!(result.results[0].actual, Some(close));
    assert_eq!(result.unexpected, vec![unrelated]);
}
