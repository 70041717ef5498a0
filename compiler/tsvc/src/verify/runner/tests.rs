use super::*;
use crate::testing::{FakeChecker, FakeOutcome};
use crate::verify::{MatchStatus, Verdict};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tempfile::tempdir;

const NOT_ASSIGNABLE: &str = "Type 'string' is not assignable to type 'number'.";

fn checker() -> FakeChecker {
    FakeChecker::new().with_coded_rule("number = \"s\"", 2322, NOT_ASSIGNABLE)
}

fn sequential() -> VerifyConfig {
    VerifyConfig {
        parallel: false,
        ..VerifyConfig::default()
    }
}

#[test]
fn test_clean_fragment_passes() {
    let verifier = Verifier::new(checker());
    let fragment = Fragment::new("clean.ts", "const x: number = 1;\n");
    let report = verifier.verify_fragment(&fragment);
    assert_eq!(report.verdict, Verdict::Pass);
    assert!(report.results.is_empty());
}

#[test]
fn test_matched_marker_passes() {
    let verifier = Verifier::new(checker());
    let fragment = Fragment::new(
        "sample.ts",
        "const x: number = \"s\";\n// ~ Type 'string' is not assignable to type 'number'\n",
    );
    let report = verifier.verify_fragment(&fragment);
    assert_eq!(report.verdict, Verdict::Pass);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].status, MatchStatus::Matched);
}

#[test]
fn test_wrong_message_fails() {
    let verifier = Verifier::new(checker());
    let fragment = Fragment::new("sample.ts", "const x: number = \"s\";\n// ~~~ wrong message\n");
    let report = verifier.verify_fragment(&fragment);
    assert_eq!(report.verdict, Verdict::Fail);
    assert_eq!(report.results[0].status, MatchStatus::Mismatched);
}

#[test]
fn test_malformed_marker_is_fatal() {
    let verifier = Verifier::new(checker());
    let fragment = Fragment::new("sample.ts", "// ~~~ floating marker\nlet a = 1;\n");
    let report = verifier.verify_fragment(&fragment);
    assert_eq!(report.verdict, Verdict::Fatal);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn test_adapter_failure_is_fatal() {
    let verifier = Verifier::new(
        FakeChecker::new().with_outcome("slow.ts", FakeOutcome::Timeout(Duration::from_secs(30))),
    );
    let fragment = Fragment::new("slow.ts", "let a = 1;\n");
    let report = verifier.verify_fragment(&fragment);
    assert_eq!(report.verdict, Verdict::Fatal);
    assert!(report.errors[0].contains("timed out"));
}

#[test]
fn test_options_reach_checker() {
    struct StrictOnly;
    impl TypeChecker for StrictOnly {
        fn name(&self) -> &str {
            "strict-only"
        }
        fn check(
            &self,
            _fragment: &Fragment,
            options: &CheckOptions,
            _shared: &SharedContext,
        ) -> Result<Vec<tsv_diagnostic::Diagnostic>, crate::adapter::AdapterError> {
            if options.get("strict") == Some("true") {
                Ok(vec![tsv_diagnostic::Diagnostic::error(1, Some(1), "strict")])
            } else {
                Ok(vec![])
            }
        }
    }

    let verifier = Verifier::new(StrictOnly);
    let loose = Fragment::new("loose.ts", "// @strict: false\nlet a;\n");
    assert_eq!(verifier.verify_fragment(&loose).verdict, Verdict::Pass);

    let strict = Fragment::new("strict.ts", "let a;\n");
    assert_eq!(verifier.verify_fragment(&strict).verdict, Verdict::Fail);
}

#[test]
fn test_run_directory_in_order() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("b.ts"), "const x: number = \"s\";\n").unwrap();
    std::fs::write(dir.path().join("a.ts"), "const y = 1;\n").unwrap();
    std::fs::write(dir.path().join("c.ts"), "const z = 2;\n").unwrap();

    let verifier = Verifier::with_config(checker(), sequential());
    let report = verifier.run(dir.path());

    let names: Vec<_> = report
        .fragments
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.ts", "b.ts", "c.ts"]);
    assert_eq!((report.passed, report.failed), (2, 1));
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = tempdir().unwrap();
    for i in 0..12 {
        let text = if i % 3 == 0 {
            "const x: number = \"s\";\n// ~ is not assignable\n"
        } else {
            "const x: number = \"s\";\n"
        };
        std::fs::write(dir.path().join(format!("f{i:02}.ts")), text).unwrap();
    }

    let in_order = Verifier::with_config(checker(), sequential()).run(dir.path());
    let parallel = Verifier::with_config(
        checker(),
        VerifyConfig {
            jobs: Some(4),
            ..VerifyConfig::default()
        },
    )
    .run(dir.path());

    let verdicts = |r: &Report| -> Vec<(String, Verdict)> {
        r.fragments
            .iter()
            .map(|f| (f.path.to_string_lossy().into_owned(), f.verdict))
            .collect()
    };
    assert_eq!(verdicts(&in_order), verdicts(&parallel));
    assert_eq!(parallel.passed, 4);
    assert_eq!(parallel.failed, 8);
}

#[test]
fn test_filter_limits_fragments() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("keep-01.ts"), "let a = 1;\n").unwrap();
    std::fs::write(dir.path().join("skip-01.ts"), "let b = 1;\n").unwrap();

    let config = VerifyConfig {
        filter: Some("keep".to_string()),
        ..sequential()
    };
    let verifier = Verifier::with_config(checker(), config);
    let report = verifier.run(dir.path());
    assert_eq!(report.total(), 1);
    assert_eq!(verifier.checker().calls(), 1);
}

#[test]
fn test_xfail_listed_fragment_still_fails_run() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("gap.ts"), "const x: number = \"s\";\n").unwrap();
    let xfail = XFailSet::parse("gap.ts\n", dir.path());

    let verifier = Verifier::with_config(checker(), sequential()).with_xfail(xfail);
    let report = verifier.run(dir.path());
    assert_eq!(report.expected_failures, 1);
    assert_eq!(report.failed, 1);
    assert!(report.fragments[0].expected_failure);
    assert_eq!(report.exit_code(), 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_entry_is_fatal() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.ts"), "const y = 1;\n").unwrap();
    std::os::unix::fs::symlink(dir.path().join("moved.ts"), dir.path().join("gone.ts")).unwrap();

    let report = Verifier::with_config(checker(), sequential()).run(dir.path());
    assert_eq!((report.passed, report.fatal), (1, 1));
    assert!(report.fragments[1].path.ends_with("gone.ts"));
    assert!(report.fragments[1].errors[0].starts_with("cannot read `"));
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_empty_directory_exit_code() {
    let dir = tempdir().unwrap();
    let report = Verifier::new(checker()).run(dir.path());
    assert_eq!(report.total(), 0);
    assert_eq!(report.exit_code(), 2);
}
