//! Tests for the check and rewrite commands.

use fieldlog_cli::commands::{run_check, run_grammars, run_rewrite};

const FIXTURE: &str = "\
fieldlog data
grammar \"Shore Survey Grammar 1.0\"

Station 1 \"Old Ruins\" Lat 20 4.925283850520 Lon -155 51.794984516976 El 65.6 MagDec 10:16:00
Theodolite 1 \"Sokkia DT500\" AzOffset 0:00:00 DecOffset 0:00:00
Reference 1 \"White Marker\" Azimuth 315:20:30
Observer asf \"Adam Frankel\"
00000 1/1/12 0:00:00 Comment 0 \"White marker is 315:20:30\"
";

#[test]
fn check_reports_record_counts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("survey.txt");
    std::fs::write(&path, FIXTURE).expect("write fixture");

    let report = run_check(&path).expect("check");
    assert_eq!(report.grammar, "Shore Survey Grammar 1.0");
    assert_eq!(report.records, 5);

    let counts = report
        .counts
        .iter()
        .map(|count| format!("{}={}", count.record_type, count.records))
        .collect::<Vec<_>>()
        .join(" ");
    insta::assert_snapshot!(
        counts,
        @"Comment=1 Observer=1 Reference=1 Station=1 Theodolite=1"
    );
}

#[test]
fn check_fails_with_the_offending_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.txt");
    std::fs::write(
        &path,
        "fieldlog data\ngrammar \"Shore Survey Grammar 1.0\"\n\nPod bobo Whales 1 Calves 0 Singers 0\n",
    )
    .expect("write fixture");

    let error = run_check(&path).expect_err("bad document");
    let message = format!("{error:#}");
    assert!(message.contains("line 4"), "{message}");
}

#[test]
fn rewrite_produces_a_canonical_copy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("survey.txt");
    std::fs::write(&path, FIXTURE).expect("write fixture");

    let out = dir.path().join("canonical.txt");
    let report = run_rewrite(&path, Some(&out)).expect("rewrite");
    assert_eq!(report.records, 5);
    assert_eq!(
        std::fs::read_to_string(&out).expect("read back"),
        FIXTURE,
        "the fixture is already canonical"
    );

    // Rewriting the copy in place is a no-op.
    run_rewrite(&out, None).expect("rewrite in place");
    assert_eq!(std::fs::read_to_string(&out).expect("read back"), FIXTURE);
}

#[test]
fn grammars_lists_the_survey_grammar() {
    let names = run_grammars().expect("grammars");
    assert_eq!(names, ["Shore Survey Grammar 1.0"]);
}
