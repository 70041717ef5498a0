use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_header_directives() {
    let options = parse_directives(
        "// @strict: false\n// @target: es2015\n\nconst x = 1;\n// @noImplicitAny: true\n",
    );
    assert_eq!(options.get("strict"), Some("false"));
    assert_eq!(options.get("target"), Some("es2015"));
    // Directives after the first code line are ordinary comments.
    assert_eq!(options.get("noImplicitAny"), None);
}

#[test]
fn test_plain_comments_do_not_end_header() {
    let options = parse_directives("// A teaching sample.\n// @strictNullChecks: false\nlet a;\n");
    assert_eq!(options.get("strictNullChecks"), Some("false"));
}

#[test]
fn test_ts_pragmas_are_not_directives() {
    let options = parse_directives("// @ts-expect-error: reason\n// @ts-ignore\nlet a: number = 'x';\n");
    assert!(options.is_empty());
}

#[test]
fn test_no_directives() {
    assert!(parse_directives("interface A { a: string; }\n").is_empty());
    assert!(parse_directives("").is_empty());
}

#[test]
fn test_merged_overrides_defaults() {
    let mut overrides = CheckOptions::new();
    overrides.set("strict", "false");
    overrides.set("lib", "es2020,dom");

    let merged = CheckOptions::defaults().merged(&overrides);
    let pairs: Vec<_> = merged.iter().collect();
    assert_eq!(pairs, vec![("lib", "es2020,dom"), ("strict", "false")]);
}

#[test]
fn test_parse_assignment() {
    assert_eq!(
        CheckOptions::parse_assignment("target=es2020"),
        Some(("target".to_string(), "es2020".to_string()))
    );
    assert_eq!(CheckOptions::parse_assignment("target"), None);
    assert_eq!(CheckOptions::parse_assignment("=x"), None);
    assert_eq!(CheckOptions::parse_assignment("no-emit=x"), None);
}
