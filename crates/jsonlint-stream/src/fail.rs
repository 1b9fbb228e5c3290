//! # Failure Stages
//!
//! Turn per-file failures into stream errors. Both stages must follow the
//! lint stage: a record without a lint result raises
//! [`PipelineError::StageMisuse`] and ends the stream.
//!
//! - [`fail_on_error`] stops at the first failing record. Records before it
//!   are forwarded; nothing after it is pulled from upstream.
//! - [`fail_after_error`] forwards every record, counts failures, and raises
//!   a single [`PipelineError::Aggregate`] once upstream ends. The aggregate
//!   message carries only the count; per-file detail stays on each record's
//!   lint result.

use std::pin::Pin;

use futures_util::stream::{self, Stream, StreamExt};
use jsonlint_core::{ErrorDetail, FileRecord, LintResult, PipelineError};

type Upstream<S> = Pin<Box<S>>;

fn misuse(stage: &'static str, record: &FileRecord) -> PipelineError {
    tracing::warn!(stage, file = %record.path().display(), "record reached stage without a lint result");
    PipelineError::StageMisuse {
        stage,
        path: record.path().to_path_buf(),
    }
}

/// Forward passing records; end with an error at the first failing one.
pub fn fail_on_error<S>(
    input: S,
) -> impl Stream<Item = Result<FileRecord, PipelineError>> + Send + 'static
where
    S: Stream<Item = FileRecord> + Send + 'static,
{
    let upstream: Option<Upstream<S>> = Some(Box::pin(input));
    stream::unfold(upstream, |upstream| async move {
        let mut upstream = upstream?;
        let record = upstream.next().await?;
        let failure: Option<Option<ErrorDetail>> =
            record.lint_result().map(|result| result.error().cloned());
        match failure {
            None => Some((Err(misuse("fail_on_error", &record)), None)),
            Some(Some(error)) => {
                let error = PipelineError::FileFailed {
                    path: record.path().to_path_buf(),
                    message: error.message().to_string(),
                };
                Some((Err(error), None))
            }
            Some(None) => Some((Ok(record), Some(upstream))),
        }
    })
}

struct Tally<S> {
    upstream: Option<Upstream<S>>,
    failures: usize,
}

/// Forward every record; after upstream ends, raise one aggregate error if
/// any record failed.
pub fn fail_after_error<S>(
    input: S,
) -> impl Stream<Item = Result<FileRecord, PipelineError>> + Send + 'static
where
    S: Stream<Item = FileRecord> + Send + 'static,
{
    let tally = Tally {
        upstream: Some(Box::pin(input)),
        failures: 0,
    };
    stream::unfold(tally, |mut tally| async move {
        let upstream = tally.upstream.as_mut()?;
        let Some(record) = upstream.next().await else {
            tally.upstream = None;
            if tally.failures == 0 {
                return None;
            }
            tracing::debug!(failures = tally.failures, "stream ended with failures");
            let error = PipelineError::Aggregate {
                count: tally.failures,
            };
            return Some((Err(error), tally));
        };
        match record.lint_result().map(LintResult::is_failure) {
            None => {
                tally.upstream = None;
                Some((Err(misuse("fail_after_error", &record)), tally))
            }
            Some(failed) => {
                if failed {
                    tally.failures += 1;
                }
                Some((Ok(record), tally))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonlint_core::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn linted(path: &str, error: Option<&str>) -> FileRecord {
        let mut record = FileRecord::new(path, "");
        record
            .attach_lint_result(match error {
                Some(message) => LintResult::failed(ErrorDetail::new(ErrorKind::Parse, message)),
                None => LintResult::passed(),
            })
            .unwrap();
        record
    }

    fn paths(items: &[Result<FileRecord, PipelineError>]) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| item.as_ref().ok())
            .map(|record| record.path().display().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_fail_fast_stops_at_first_failure() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = pulled.clone();
        let input = stream::iter(vec![
            linted("1.json", None),
            linted("2.json", Some("Unexpected \"}\"")),
            linted("3.json", None),
            linted("4.json", Some("later")),
        ])
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let items: Vec<_> = fail_on_error(input).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(paths(&items), ["1.json"]);
        let err = items[1].as_ref().unwrap_err();
        assert_eq!(err.to_string(), "Unexpected \"}\"");
        assert_eq!(err.path().unwrap().to_str(), Some("2.json"));
        assert_eq!(err.name(), "JSONLintError");
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fail_fast_all_passing() {
        let input = stream::iter(vec![linted("1.json", None), linted("2.json", None)]);
        let items: Vec<_> = fail_on_error(input).collect().await;
        assert!(items.iter().all(Result::is_ok));
        assert_eq!(paths(&items), ["1.json", "2.json"]);
    }

    #[tokio::test]
    async fn test_fail_at_end_counts_failures() {
        let input = stream::iter(vec![
            linted("1.json", Some("bad")),
            linted("2.json", None),
            linted("3.json", Some("worse")),
        ]);
        let items: Vec<_> = fail_after_error(input).collect().await;
        assert_eq!(items.len(), 4);
        assert_eq!(paths(&items), ["1.json", "2.json", "3.json"]);
        let err = items[3].as_ref().unwrap_err();
        assert_eq!(err, &PipelineError::Aggregate { count: 2 });
        assert_eq!(err.to_string(), "Failed with 2 errors");
        assert!(!err.to_string().contains("1.json"));
    }

    #[tokio::test]
    async fn test_fail_at_end_single_failure_message() {
        let input = stream::iter(vec![linted("1.json", Some("bad"))]);
        let items: Vec<_> = fail_after_error(input).collect().await;
        assert_eq!(
            items[1].as_ref().unwrap_err().to_string(),
            "Failed with 1 error"
        );
    }

    #[tokio::test]
    async fn test_fail_at_end_clean_stream() {
        let input = stream::iter(vec![linted("1.json", None)]);
        let items: Vec<_> = fail_after_error(input).collect().await;
        assert_eq!(items.len(), 1);
        assert!(items[0].is_ok());

        let empty: Vec<_> = fail_after_error(stream::iter(Vec::<FileRecord>::new()))
            .collect()
            .await;
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_unlinted_records_are_misuse() {
        let unlinted = || stream::iter(vec![linted("1.json", None), FileRecord::new("2.json", "{}")]);

        let items: Vec<_> = fail_on_error(unlinted()).collect().await;
        assert_eq!(items.len(), 2);
        assert!(matches!(
            items[1],
            Err(PipelineError::StageMisuse { stage: "fail_on_error", .. })
        ));

        let items: Vec<_> = fail_after_error(unlinted()).collect().await;
        assert_eq!(items.len(), 2);
        let err = items[1].as_ref().unwrap_err();
        assert_eq!(err.name(), "StageMisuseError");
        assert_eq!(err.path().unwrap().to_str(), Some("2.json"));
    }
}
