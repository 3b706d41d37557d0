use covgate::error::CovgateError;
use covgate::mutation::{transcript, xml, MutantStatus};

#[test]
fn xml_report_end_to_end() {
    let report = xml::parse(include_bytes!("fixtures/sample_mutations.xml")).unwrap();

    assert_eq!(report.totals.total, 4);
    assert_eq!(report.totals.killed, 2);
    assert_eq!(report.totals.survived, 1);
    assert_eq!(report.totals.no_coverage, 1);
    assert_eq!(report.score, 50.0);

    // The totals invariant holds for any report.
    let t = report.totals;
    assert_eq!(
        t.total,
        t.killed + t.survived + t.no_coverage + t.timeout + t.memory_error
    );

    let survivors: Vec<_> = report.surviving().collect();
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].source_file, "Calculator.java");
    assert_eq!(survivors[0].line, 31);

    assert_eq!(
        report.source_files(),
        vec!["Calculator.java", "Formatter.java"]
    );
}

#[test]
fn transcript_end_to_end() {
    let report = transcript::parse(include_str!("fixtures/sample_transcript.log")).unwrap();

    assert_eq!(report.totals.total, 5);
    assert_eq!(report.score, 40.0);

    let t = report.totals;
    assert_eq!(
        t.total,
        t.killed + t.survived + t.no_coverage + t.timeout + t.memory_error
    );
}

/// Both mutation parsers converge on the same normalized shape.
#[test]
fn parsers_agree_on_shape() {
    let from_xml = xml::parse(
        br#"<mutations><mutation detected="true" status="KILLED">
            <sourceFile>A.java</sourceFile>
            <lineNumber>10</lineNumber>
            <mutator>ReturnValsMutator</mutator>
            <killingTest>FooTest</killingTest>
        </mutation></mutations>"#,
    )
    .unwrap();
    let from_log = transcript::parse(">> Line 10: ReturnValsMutator KILLED by FooTest\n").unwrap();

    let a = &from_xml.mutants[0];
    let b = &from_log.mutants[0];
    assert_eq!(a.line, b.line);
    assert_eq!(a.mutator_kind, b.mutator_kind);
    assert_eq!(a.status, b.status);
    assert_eq!(a.killed_by, b.killed_by);
    assert_eq!(from_xml.score, from_log.score);
}

#[test]
fn transcript_killed_line_fields() {
    let report = transcript::parse(">> Line 10: ReturnValsMutator KILLED by FooTest").unwrap();
    assert_eq!(report.mutants.len(), 1);
    let m = &report.mutants[0];
    assert_eq!(m.status, MutantStatus::Killed);
    assert_eq!(m.line, 10);
    assert_eq!(m.mutator_kind, "ReturnValsMutator");
    assert_eq!(m.killed_by, vec!["FooTest"]);
}

#[test]
fn unrecognized_status_is_typed_error() {
    let err = xml::parse(
        br#"<mutations><mutation detected="true" status="WEIRD">
            <sourceFile>A.java</sourceFile>
            <lineNumber>1</lineNumber>
            <mutator>M</mutator>
        </mutation></mutations>"#,
    )
    .unwrap_err();

    match err {
        CovgateError::UnrecognizedMutationStatus { status, .. } => assert_eq!(status, "WEIRD"),
        other => panic!("expected UnrecognizedMutationStatus, got {other:?}"),
    }
}
