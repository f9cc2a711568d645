//! File-level round-trip tests with a small grammar.

use std::sync::Arc;

use fieldlog_format::{DocumentFormat, FieldFormatRegistry, RecordFormat};
use fieldlog_io::{FileError, GrammarRegistry, is_recognized, read_document, write_document};
use fieldlog_model::{FieldType, RecordType, Schema};

fn grammar() -> Arc<DocumentFormat> {
    let registry = FieldFormatRegistry::default();
    let layer = Schema::new([
        ("id", FieldType::integer().min(0).build().expect("field")),
        ("name", FieldType::string().build().expect("field")),
    ]);
    let marker = Arc::new(RecordType::compose("Marker", &[&layer]).expect("compose"));
    Arc::new(
        DocumentFormat::new(
            "Marker Grammar 1.0",
            [RecordFormat::from_spec("Marker* {id} {name}", &marker, &registry).expect("format")],
        )
        .expect("document format"),
    )
}

fn registry() -> GrammarRegistry {
    let mut registry = GrammarRegistry::new();
    registry.register(grammar());
    registry
}

#[test]
fn write_then_read_reproduces_the_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("markers.txt");
    let format = grammar();
    let registry = registry();

    let contents = "fieldlog data\ngrammar \"Marker Grammar 1.0\"\n\nMarker 1 \"White Marker\"\nMarker 2 Buoy\n";
    std::fs::write(&path, contents).expect("write fixture");

    assert!(is_recognized(&path));
    let document = read_document(&path, &registry).expect("read");
    assert_eq!(document.len(), 2);
    assert_eq!(document.format_name(), Some("Marker Grammar 1.0"));

    let out = dir.path().join("copy.txt");
    write_document(&document, &out, &format).expect("write");
    assert_eq!(std::fs::read_to_string(&out).expect("read back"), contents);

    let reread = read_document(&out, &registry).expect("reread");
    assert_eq!(reread.records(), document.records());
}

#[test]
fn windows_line_endings_are_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("markers.txt");
    std::fs::write(
        &path,
        "fieldlog data\r\ngrammar \"Marker Grammar 1.0\"\r\n\r\nMarker 1 Reef\r\n",
    )
    .expect("write fixture");
    let document = read_document(&path, &registry()).expect("read");
    assert_eq!(document.len(), 1);
}

#[test]
fn missing_or_bad_headers_fail() {
    let dir = tempfile::tempdir().expect("tempdir");

    let path = dir.path().join("other.txt");
    std::fs::write(&path, "something else\n").expect("write fixture");
    assert!(!is_recognized(&path));
    assert!(matches!(
        read_document(&path, &registry()),
        Err(FileError::UnrecognizedFormat { .. })
    ));

    let path = dir.path().join("nogrammar.txt");
    std::fs::write(&path, "fieldlog data\nsomething else\n").expect("write fixture");
    assert!(matches!(
        read_document(&path, &registry()),
        Err(FileError::MissingHeader { line: 2, .. })
    ));

    let path = dir.path().join("unknown.txt");
    std::fs::write(&path, "fieldlog data\ngrammar \"Nope\"\n\n").expect("write fixture");
    assert!(matches!(
        read_document(&path, &registry()),
        Err(FileError::UnknownGrammar { .. })
    ));
}

#[test]
fn parse_errors_carry_file_line_numbers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.txt");
    // Line 4 is fine, line 5 has a bad integer.
    std::fs::write(
        &path,
        "fieldlog data\ngrammar \"Marker Grammar 1.0\"\n\nMarker 1 Reef\nMarker bobo Reef\n",
    )
    .expect("write fixture");

    let err = read_document(&path, &registry()).expect_err("bad line");
    match err {
        FileError::Parse { source, .. } => assert_eq!(source.line(), Some(5)),
        other => panic!("unexpected error {other}"),
    }
}
