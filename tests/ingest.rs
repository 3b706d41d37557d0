use std::path::PathBuf;

use covgate::detect::Format;
use covgate::error::CovgateError;
use covgate::ingest;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn ingest_lcov_auto_detect() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "coverage.info", include_bytes!("fixtures/sample.lcov"));

    let (report, format) = ingest::load_coverage(&path, None).unwrap();
    assert_eq!(format, Format::Lcov);
    assert_eq!(report.files_by_path.len(), 2);
    assert_eq!(report.total_lines, 7);
    assert_eq!(report.covered_lines, 4);
}

#[test]
fn ingest_jacoco_auto_detect() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "jacoco.xml",
        include_bytes!("fixtures/sample_jacoco.xml"),
    );

    let (report, format) = ingest::load_coverage(&path, None).unwrap();
    assert_eq!(format, Format::Jacoco);
    assert!(report.files_by_path.contains_key("com/example/Foo.java"));
}

#[test]
fn ingest_mutation_xml_auto_detect() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "mutations.xml",
        include_bytes!("fixtures/sample_mutations.xml"),
    );

    let (report, format) = ingest::load_mutation(&path, None).unwrap();
    assert_eq!(format, Format::MutationXml);
    assert_eq!(report.totals.total, 4);
}

#[test]
fn ingest_transcript_auto_detect() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "run.log",
        include_bytes!("fixtures/sample_transcript.log"),
    );

    let (report, format) = ingest::load_mutation(&path, None).unwrap();
    assert_eq!(format, Format::MutationLog);
    assert_eq!(report.totals.total, 5);
}

#[test]
fn ingest_format_override_wins() {
    let dir = tempfile::tempdir().unwrap();
    // Extension suggests nothing; content is line-record text.
    let path = write_file(&dir, "weird.dat", b"SF:a.ts\nDA:1,1\nend_of_record\n");

    let (_, format) = ingest::load_coverage(&path, Some("lcov")).unwrap();
    assert_eq!(format, Format::Lcov);
}

#[test]
fn ingest_unknown_format_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "mystery.dat", b"not a report at all");

    let err = ingest::load_coverage(&path, None).unwrap_err();
    assert!(matches!(err, CovgateError::UnknownFormat));
}

#[test]
fn ingest_family_mismatch_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "mutations.xml",
        include_bytes!("fixtures/sample_mutations.xml"),
    );

    // A mutation report handed to the coverage loader is rejected.
    let err = ingest::load_coverage(&path, None).unwrap_err();
    assert!(matches!(err, CovgateError::Parse(_)));
}
