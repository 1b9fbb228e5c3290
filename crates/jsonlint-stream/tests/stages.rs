//! Lint and report stages over the fixture files.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::{stream, StreamExt};
use jsonlint_core::{ErrorKind, FileRecord, Indent, LintOptions, Mode};
use jsonlint_stream::{Formatter, LintStage, MemorySink, ReportStage, Reporter, ReporterConfig};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

async fn fixture(name: &str) -> FileRecord {
    FileRecord::read(fixtures().join(name))
        .await
        .unwrap()
        .with_base(fixtures())
}

async fn lint_one(options: &LintOptions, name: &str) -> FileRecord {
    LintStage::new(options).lint_file(fixture(name).await).await
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn test_valid_fixture_passes() {
    init_tracing();
    let record = lint_one(&LintOptions::default(), "valid.json").await;
    let result = record.lint_result().unwrap();
    assert!(result.success());
    assert!(result.error().is_none());
}

#[tokio::test]
async fn test_trailing_comma_fixture_fails_with_location() {
    let record = lint_one(&LintOptions::default(), "invalid.json").await;
    let error = record.lint_result().unwrap().error().unwrap().clone();
    assert_eq!(error.kind(), ErrorKind::Parse);
    let at = error.location().unwrap();
    assert!(at.line >= 3, "{at:?}");
    assert!(error
        .message()
        .starts_with(&format!("Parse error on line {}, column {}:", at.line, at.column)));
    assert!(error.reason().to_lowercase().contains("trailing comma"));

    let tolerant = LintOptions {
        ignore_trailing_commas: true,
        ..LintOptions::default()
    };
    assert!(lint_one(&tolerant, "invalid.json").await.lint_result().unwrap().success());
}

#[tokio::test]
async fn test_comment_tolerance_flags() {
    let strict = lint_one(&LintOptions::default(), "comments.json").await;
    assert!(strict.lint_result().unwrap().is_failure());

    for options in [
        LintOptions::from_json_str(r#"{"ignoreComments": true}"#).unwrap(),
        LintOptions::from_json_str(r#"{"cjson": true}"#).unwrap(),
        LintOptions::from_json_str(r#"{"mode": "cjson"}"#).unwrap(),
    ] {
        let record = lint_one(&options, "comments.json").await;
        assert!(record.lint_result().unwrap().success(), "{options:?}");
    }
}

#[tokio::test]
async fn test_json5_fixture_formats_compactly() {
    let strict = lint_one(&LintOptions::default(), "json5.json").await;
    assert!(strict.lint_result().unwrap().is_failure());

    let options = LintOptions {
        mode: Mode::Json5,
        format: true,
        indent: Indent::Spaces(0),
        ..LintOptions::default()
    };
    let record = lint_one(&options, "json5.json").await;
    assert!(record.lint_result().unwrap().success());
    assert_eq!(
        record.contents_str(),
        "{\"name\":\"jsonlint\",\"version\":16,\"tags\":[\"json\",\"lint\"]}\n"
    );
}

#[tokio::test]
async fn test_sort_keys_fixture() {
    let options = LintOptions::from_yaml_str("format: true\nsortKeys: true\nindent: 1\n").unwrap();
    let record = lint_one(&options, "unsorted.json").await;
    assert_eq!(
        record.contents_str(),
        "{\n \"alpha\": {\n  \"a\": null,\n  \"b\": true\n },\n \"zeta\": 1\n}\n"
    );
}

#[tokio::test]
async fn test_schema_validation_fixture() {
    let options = LintOptions::from_json_str(&format!(
        r#"{{"schema": {{"src": {:?}, "environment": "json-schema-draft-07"}}}}"#,
        fixtures().join("schema.json").display().to_string()
    ))
    .unwrap();

    let valid = lint_one(&options, "valid.json").await;
    assert!(valid.lint_result().unwrap().success());

    let wrong = lint_one(&options, "wrong_type.json").await;
    let error = wrong.lint_result().unwrap().error().unwrap().clone();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert!(error.message().contains("/version"));
    assert!(error.location().is_none());
}

#[tokio::test]
async fn test_report_stage_over_fixtures() {
    let sink = MemorySink::new();
    let report = ReportStage::new(ReporterConfig::split(Formatter::MsBuild, Reporter::JsHint))
        .with_sink(Arc::new(sink.clone()));
    let stage = LintStage::new(&LintOptions::default()).with_concurrency(2);

    let records = vec![
        fixture("valid.json").await,
        fixture("invalid.json").await,
        fixture("comments.json").await,
    ];
    let output: Vec<FileRecord> = report.report(stage.lint(stream::iter(records))).collect().await;

    let names: Vec<_> = output
        .iter()
        .map(|record| record.relative().display().to_string())
        .collect();
    assert_eq!(names, ["valid.json", "invalid.json", "comments.json"]);

    let at = output[1]
        .lint_result()
        .and_then(|result| result.error())
        .and_then(|error| error.location())
        .unwrap();
    let reports = sink.reports();
    assert_eq!(reports.len(), 2);
    assert!(reports[0].starts_with(&format!(
        "invalid.json({},{}): error: failed JSON validation\ninvalid.json: line {}, col {}, ",
        at.line, at.column, at.line, at.column
    )));
    assert!(reports[1].starts_with("comments.json(1,1): error: failed JSON validation\n"));
}

#[tokio::test]
async fn test_duplicate_keys_and_trailing_commas_by_option() {
    let lint = |options: LintOptions, text: &'static str| async move {
        LintStage::new(&options)
            .lint_file(FileRecord::new("inline.json", text))
            .await
            .lint_result()
            .unwrap()
            .success()
    };

    assert!(lint(LintOptions::default(), r#"{"a": 1, "a": 2}"#).await);
    let strict_keys = LintOptions::from_json_str(r#"{"allowDuplicateObjectKeys": false}"#).unwrap();
    assert!(!lint(strict_keys, r#"{"a": 1, "a": 2}"#).await);

    assert!(!lint(LintOptions::default(), "[1, 2,]").await);
    let json5 = LintOptions::from_json_str(r#"{"mode": "json5"}"#).unwrap();
    assert!(lint(json5, "[1, 2,]").await);
}
