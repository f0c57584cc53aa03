//! End-to-end pipeline tests
//!
//! Drive the library the way the CLI does: write raw CSV fixtures to a
//! temp directory, prep them, load the prepared tables, run the pipeline,
//! and check the rendered reports.

use std::path::Path;
use tempfile::TempDir;

use threadscope::ingest::{load_comments, SubmissionTable};
use threadscope::pipeline::Pipeline;
use threadscope::prep::{prepare_comments, prepare_submissions, RawTable};
use threadscope::reporters::{self, OutputFormat};

/// Raw export fixtures, epoch timestamps and prefixed ids included.
///
/// Thread shapes:
/// - aaa: chain c1 <- c2 plus top-level c3 (controversial), three authors
/// - bbb: empty thread
/// - ccc: detached reply cycle (c4 <-> c5)
const RAW_SUBMISSIONS: &str = "\
id,title,selftext,score,ups,num_comments
aaa,First,so happy and excited,10,3,3
bbb,Second,,5,1,0
ccc,Third,plain text,2,1,2
";

// epochs: 1430478000 = 2015-05-01T11:00:00, +3600 per hour after
const RAW_COMMENTS: &str = "\
id,parent_id,link_id,author,created_utc,controversiality,body,score,ups
c1,t3_aaa,t3_aaa,alice,1430478000,0,first!,4,1
c2,t1_c1,t3_aaa,bob,1430481600,0,,2,0
c3,t3_aaa,t3_aaa,carol,1430485200,1,hot take,1,0
c4,t1_c5,t3_ccc,dave,1430478000,0,loop,1,0
c5,t1_c4,t3_ccc,erin,1430478000,0,loop,1,0
";

fn write_fixtures(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let submissions = dir.join("posts.csv");
    let comments = dir.join("comments.csv");
    std::fs::write(&submissions, RAW_SUBMISSIONS).expect("write submissions");
    std::fs::write(&comments, RAW_COMMENTS).expect("write comments");
    (submissions, comments)
}

fn prepared_tables(dir: &Path) -> (SubmissionTable, Vec<threadscope::models::Comment>) {
    let (submissions_path, comments_path) = write_fixtures(dir);

    let submissions =
        prepare_submissions(&RawTable::from_path(&submissions_path).expect("read")).expect("prep");
    let comments =
        prepare_comments(&RawTable::from_path(&comments_path).expect("read")).expect("prep");

    let prepared_submissions = dir.join("prepared_posts.csv");
    let prepared_comments = dir.join("prepared_comments.csv");
    submissions
        .write_to_path(&prepared_submissions)
        .expect("write");
    comments.write_to_path(&prepared_comments).expect("write");

    (
        SubmissionTable::from_path(&prepared_submissions).expect("load"),
        load_comments(&prepared_comments).expect("load"),
    )
}

#[test]
fn full_run_produces_expected_csv() {
    let dir = TempDir::new().expect("tempdir");
    let (table, comments) = prepared_tables(dir.path());

    let run = Pipeline::new(2).run(&table, &comments).expect("run");
    let out = reporters::report_with_format(&table, &run, OutputFormat::Csv).expect("render");
    let lines: Vec<&str> = out.lines().collect();

    // dropped columns are gone, metric columns appended
    assert_eq!(
        lines[0],
        "id,title,selftext,score,no_comments,depth,wiener_index,no_controversial,post_duration,gini_coefficient"
    );
    // aaa: 3 comments, chain of 2 -> depth 3, branches [2,1] -> 3/2+1 = 2.5,
    // duration 11:00 -> 13:00 = 2h, authors 1/1/1 -> gini 0
    assert_eq!(lines[1], "aaa,First,so happy and excited,10,3,3,2.5,1,2,0");
    // bbb: empty thread, defined zeros, undefined gini/duration
    assert_eq!(lines[2], "bbb,Second,[no_text],5,0,0,0,0,unknown,unknown");
    // ccc: cycle -> raw counts survive, tree metrics unknown
    assert_eq!(lines[3], "ccc,Third,plain text,2,2,unknown,unknown,0,unknown,unknown");
}

#[test]
fn full_run_json_marks_undefined_as_null() {
    let dir = TempDir::new().expect("tempdir");
    let (table, comments) = prepared_tables(dir.path());

    let run = Pipeline::new(2).run(&table, &comments).expect("run");
    let out = reporters::report_with_format(&table, &run, OutputFormat::Json).expect("render");
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).expect("parse");

    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0]["no_comments"], 3);
    assert_eq!(parsed[0]["depth"], 3);
    assert_eq!(parsed[0]["wiener_index"], 2.5);
    assert!(parsed[1]["gini_coefficient"].is_null());
    assert!(parsed[2]["depth"].is_null());
    assert_eq!(parsed[2]["no_comments"], 2);
    assert_eq!(run.summary.tree_failures, 1);
}

#[test]
fn rerun_is_deterministic() {
    let dir = TempDir::new().expect("tempdir");
    let (table, comments) = prepared_tables(dir.path());

    let first = Pipeline::new(4).run(&table, &comments).expect("run");
    let second = Pipeline::new(4).run(&table, &comments).expect("run");
    assert_eq!(first.metrics, second.metrics);

    let csv_a = reporters::report_with_format(&table, &first, OutputFormat::Csv).expect("render");
    let csv_b = reporters::report_with_format(&table, &second, OutputFormat::Csv).expect("render");
    assert_eq!(csv_a, csv_b);
}

#[test]
fn emotions_flag_adds_labeled_column() {
    use std::sync::Arc;
    use threadscope::classify::LexiconClassifier;

    let dir = TempDir::new().expect("tempdir");
    let (table, comments) = prepared_tables(dir.path());

    let run = Pipeline::new(1)
        .with_classifier(Arc::new(LexiconClassifier::default()))
        .run(&table, &comments)
        .expect("run");
    let out = reporters::report_with_format(&table, &run, OutputFormat::Csv).expect("render");

    let header = out.lines().next().expect("header");
    assert!(header.ends_with(",emotion"));
    // "so happy and excited" -> joy
    assert!(out.lines().nth(1).expect("aaa").ends_with(",joy"));
}
