use covgate::diffcov::{self, DiffSelection};
use covgate::parsers::{jacoco, lcov};

/// End-to-end walkthrough: parse a line-record report, select changed
/// lines, check per-file and aggregate numbers.
#[test]
fn diff_coverage_end_to_end() {
    let report = lcov::parse(b"SF:a.ts\nDA:1,5\nDA:2,0\nend_of_record\n").unwrap();
    assert_eq!(report.total_lines, 2);
    assert_eq!(report.covered_lines, 1);
    assert_eq!(report.coverage_pct, 50.0);

    let summary = diffcov::compute(&report, &[DiffSelection::new("a.ts", [1, 2])]);
    let file = &summary.files[0];
    assert_eq!(file.lines_in_diff, 2);
    assert_eq!(file.lines_covered, 1);
    assert_eq!(file.pct, 50.0);
    assert_eq!(summary.pct, 50.0);
}

/// A diff naming repo-relative paths is reconciled against the
/// package-qualified keys of a hierarchical XML report.
#[test]
fn diff_coverage_reconciles_jacoco_paths() {
    let report = jacoco::parse(include_bytes!("fixtures/sample_jacoco.xml")).unwrap();

    let summary = diffcov::compute(
        &report,
        &[DiffSelection::new(
            "src/main/java/com/example/Foo.java",
            [3, 11],
        )],
    );
    let file = &summary.files[0];
    // Line 3 is covered (ci=3), line 11 is missed (ci=0).
    assert_eq!(file.lines_in_diff, 2);
    assert_eq!(file.lines_covered, 1);
    assert_eq!(file.missed_lines, vec![11]);
}

/// Aggregate percentage is computed from summed counts across files, and
/// an unmatched file drags the aggregate down as fully uncovered.
#[test]
fn diff_coverage_aggregate_with_unmatched_file() {
    let report = lcov::parse(
        b"SF:a.ts\nDA:1,1\nDA:2,1\nDA:3,1\nend_of_record\n",
    )
    .unwrap();

    let summary = diffcov::compute(
        &report,
        &[
            DiffSelection::new("a.ts", [1, 2, 3]),
            DiffSelection::new("unmeasured.ts", [7]),
        ],
    );

    assert_eq!(summary.lines_in_diff, 4);
    assert_eq!(summary.lines_covered, 3);
    assert_eq!(summary.pct, 75.0);
    assert_eq!(
        summary.pct,
        summary.lines_covered as f64 / summary.lines_in_diff as f64 * 100.0
    );
}

/// No changed lines means nothing to fail on.
#[test]
fn diff_coverage_empty_selection_is_100() {
    let report = lcov::parse(include_bytes!("fixtures/sample.lcov")).unwrap();
    let summary = diffcov::compute(&report, &[]);
    assert_eq!(summary.lines_in_diff, 0);
    assert_eq!(summary.pct, 100.0);
}

/// Both coverage parsers feed the same calculator without format-specific
/// behavior.
#[test]
fn diff_coverage_is_format_agnostic() {
    let from_text = lcov::parse(b"SF:com/example/Foo.java\nDA:3,3\nDA:10,5\nDA:11,0\nDA:12,1\nend_of_record\n").unwrap();
    let from_xml = jacoco::parse(include_bytes!("fixtures/sample_jacoco.xml")).unwrap();

    let selection = [DiffSelection::new("com/example/Foo.java", [10, 11])];
    let text_summary = diffcov::compute(&from_text, &selection);
    let xml_summary = diffcov::compute(&from_xml, &selection);

    assert_eq!(text_summary.lines_covered, xml_summary.lines_covered);
    assert_eq!(text_summary.pct, xml_summary.pct);
}
