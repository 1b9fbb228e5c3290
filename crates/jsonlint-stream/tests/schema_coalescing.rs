//! One schema read per lint stage, however many files are in flight.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use jsonlint_core::{ErrorKind, FileRecord, LintOptions, SchemaOptions};
use jsonlint_stream::{FsSchemaSource, LintStage, Pipeline, SchemaSource};

#[derive(Debug, Default)]
struct CountingSource {
    reads: AtomicUsize,
}

#[async_trait]
impl SchemaSource for CountingSource {
    async fn read(&self, path: &Path) -> std::io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        FsSchemaSource.read(path).await
    }
}

fn schema_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"type": "object", "required": ["id"], "properties": {{"id": {{"type": "integer"}}}}}}"#
    )
    .unwrap();
    file
}

fn options(schema: PathBuf) -> LintOptions {
    LintOptions {
        schema: SchemaOptions {
            src: Some(schema),
            environment: None,
        },
        ..LintOptions::default()
    }
}

fn files(count: usize) -> Vec<FileRecord> {
    (0..count)
        .map(|i| {
            let body = if i % 3 == 2 {
                format!(r#"{{"id": "{i}"}}"#)
            } else {
                format!(r#"{{"id": {i}}}"#)
            };
            FileRecord::new(format!("{i}.json"), body)
        })
        .collect()
}

#[tokio::test]
async fn test_concurrent_files_share_one_schema_read() {
    let schema = schema_file();
    let source = Arc::new(CountingSource::default());
    let stage = LintStage::new(&options(schema.path().to_path_buf()))
        .with_schema_source(source.clone())
        .with_concurrency(4);

    let outcome = Pipeline::new(stage.clone()).run(files(9)).await;
    assert_eq!(outcome.files.len(), 9);
    assert_eq!(outcome.failures(), 3);
    assert_eq!(source.reads.load(Ordering::SeqCst), 1);
    assert!(stage.schema_cache().unwrap().is_loaded());

    let again = Pipeline::new(stage).run(files(3)).await;
    assert_eq!(again.failures(), 1);
    assert_eq!(source.reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_schema_fails_every_file_with_one_read() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(CountingSource::default());
    let stage = LintStage::new(&options(dir.path().join("absent.json")))
        .with_schema_source(source.clone())
        .with_concurrency(4);

    let outcome = Pipeline::new(stage).run(files(5)).await;
    assert!(outcome.error.is_none());
    assert_eq!(outcome.failures(), 5);
    for record in &outcome.files {
        let error = record.lint_result().unwrap().error().unwrap();
        assert_eq!(error.kind(), ErrorKind::SchemaLoad);
        assert!(error.message().contains("absent.json"));
    }
    assert_eq!(source.reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_separate_stages_do_not_share_a_cache() {
    let schema = schema_file();
    let source = Arc::new(CountingSource::default());
    let build = || {
        LintStage::new(&options(schema.path().to_path_buf())).with_schema_source(source.clone())
    };

    Pipeline::new(build()).run(files(2)).await;
    Pipeline::new(build()).run(files(2)).await;
    assert_eq!(source.reads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_dropped_stream_does_not_cause_a_second_read() {
    let schema = schema_file();
    let source = Arc::new(CountingSource::default());
    let stage = LintStage::new(&options(schema.path().to_path_buf()))
        .with_schema_source(source.clone());

    let mut linted = Box::pin(stage.clone().lint(stream::iter(files(3))));
    let first = tokio::time::timeout(Duration::from_millis(1), linted.next()).await;
    assert!(first.is_err());
    drop(linted);

    let record = stage.lint_file(FileRecord::new("late.json", r#"{"id": 7}"#)).await;
    assert!(record.lint_result().unwrap().success());
    assert_eq!(source.reads.load(Ordering::SeqCst), 1);
}
