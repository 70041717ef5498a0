use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_parse_located_error() {
    let entry = parse_line(
        "sample.ts(9,9): error TS2322: Type 'string' is not assignable to type 'number'.",
    );
    assert_eq!(
        entry,
        Some(TscEntry::Located {
            file: PathBuf::from("sample.ts"),
            diagnostic: Diagnostic::error(
                9,
                Some(9),
                "Type 'string' is not assignable to type 'number'."
            )
            .with_code(DiagnosticCode::new(2322)),
        })
    );
}

#[test]
fn test_parse_global_error() {
    let entry = parse_line("error TS5023: Unknown compiler option 'bogus'.");
    assert_eq!(
        entry,
        Some(TscEntry::Global {
            severity: Severity::Error,
            code: Some(DiagnosticCode::new(5023)),
            message: "Unknown compiler option 'bogus'.".to_string(),
        })
    );
}

#[test]
fn test_path_with_parentheses() {
    let entry = parse_line("dir (copy)/a.ts(2,5): warning TS6133: 'x' is declared but never used.");
    let Some(TscEntry::Located { file, diagnostic }) = entry else {
        panic!("expected located entry");
    };
    assert_eq!(file, PathBuf::from("dir (copy)/a.ts"));
    assert_eq!(diagnostic.location, Location::new(2, Some(5)));
    assert_eq!(diagnostic.severity, Severity::Warning);
}

#[test]
fn test_message_containing_location_like_text() {
    let entry = parse_line("a.ts(1,1): error TS2345: Argument of type '(x): void' is bad.");
    let Some(TscEntry::Located { diagnostic, .. }) = entry else {
        panic!("expected located entry");
    };
    assert_eq!(diagnostic.message, "Argument of type '(x): void' is bad.");
}

#[test]
fn test_continuation_lines_join_previous_message() {
    let output = "\
a.ts(12,3): error TS2322: Type 'Bar' is not assignable to type 'Foo'.
  Property 'foo' is missing in type 'Bar' but required in type 'Foo'.
a.ts(20,1): error TS2304: Cannot find name 'nope'.
";
    let parsed = parse_output(output);
    assert_eq!(parsed.entries.len(), 2);
    let TscEntry::Located { diagnostic, .. } = &parsed.entries[0] else {
        panic!("expected located entry");
    };
    assert_eq!(
        diagnostic.message,
        "Type 'Bar' is not assignable to type 'Foo'.\n  Property 'foo' is missing in type 'Bar' but required in type 'Foo'."
    );
    assert!(parsed.unrecognized.is_empty());
}

#[test]
fn test_unrecognized_lines_are_collected() {
    let parsed = parse_output("Version 5.4.5\n\n  dangling\nFound 1 error.\n");
    assert!(parsed.is_empty());
    assert_eq!(
        parsed.unrecognized,
        vec!["Version 5.4.5", "  dangling", "Found 1 error."]
    );
}

#[test]
fn test_empty_output() {
    let parsed = parse_output("");
    assert!(parsed.is_empty());
    assert!(parsed.unrecognized.is_empty());
}
