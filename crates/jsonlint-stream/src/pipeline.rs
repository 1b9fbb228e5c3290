//! # Pipeline
//!
//! Assembles the stages in their only meaningful order: lint, then an
//! optional report stage, then an optional failure stage.

use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use jsonlint_core::{FileRecord, PipelineError};

use crate::fail::{fail_after_error, fail_on_error};
use crate::lint::LintStage;
use crate::report::ReportStage;

/// How per-file failures surface at the end of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Failures stay on each record's lint result; the stream never errors.
    #[default]
    Collect,
    /// The first failing record ends the stream with an error.
    FailFast,
    /// Every record passes through; one aggregate error follows the last.
    FailAtEnd,
}

/// The drained result of [`Pipeline::run`].
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Records that made it through, in input order.
    pub files: Vec<FileRecord>,
    /// The stream error that ended the run, if any.
    pub error: Option<PipelineError>,
}

impl PipelineOutcome {
    /// Number of forwarded records whose lint result is a failure.
    pub fn failures(&self) -> usize {
        self.files
            .iter()
            .filter(|record| record.lint_result().is_some_and(|r| r.is_failure()))
            .count()
    }

    /// The records, or the stream error.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the run.
    pub fn into_result(self) -> Result<Vec<FileRecord>, PipelineError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.files),
        }
    }
}

/// A lint stage with optional reporting and failure surfacing.
#[derive(Debug, Clone)]
pub struct Pipeline {
    lint: LintStage,
    report: Option<ReportStage>,
    failure: FailureMode,
}

impl Pipeline {
    /// A pipeline that only lints.
    pub fn new(lint: LintStage) -> Self {
        Self {
            lint,
            report: None,
            failure: FailureMode::Collect,
        }
    }

    /// Report failures after linting.
    pub fn with_reporter(mut self, report: ReportStage) -> Self {
        self.report = Some(report);
        self
    }

    /// Surface failures as stream errors.
    pub fn with_failure_mode(mut self, failure: FailureMode) -> Self {
        self.failure = failure;
        self
    }

    /// The composed stream over `input`.
    pub fn into_stream<S>(self, input: S) -> BoxStream<'static, Result<FileRecord, PipelineError>>
    where
        S: Stream<Item = FileRecord> + Send + 'static,
    {
        let linted = self.lint.lint(input).boxed();
        let reported = match self.report {
            Some(report) => report.report(linted).boxed(),
            None => linted,
        };
        match self.failure {
            FailureMode::Collect => reported.map(Ok::<FileRecord, PipelineError>).boxed(),
            FailureMode::FailFast => fail_on_error(reported).boxed(),
            FailureMode::FailAtEnd => fail_after_error(reported).boxed(),
        }
    }

    /// Run `files` through the pipeline and collect everything it yields.
    pub async fn run<I>(self, files: I) -> PipelineOutcome
    where
        I: IntoIterator<Item = FileRecord>,
        I::IntoIter: Send + 'static,
    {
        let mut output = self.into_stream(stream::iter(files));
        let mut outcome = PipelineOutcome {
            files: Vec::new(),
            error: None,
        };
        while let Some(item) = output.next().await {
            match item {
                Ok(record) => outcome.files.push(record),
                Err(error) => {
                    outcome.error = Some(error);
                    break;
                }
            }
        }
        tracing::debug!(
            files = outcome.files.len(),
            failures = outcome.failures(),
            errored = outcome.error.is_some(),
            "pipeline finished"
        );
        outcome
    }
}
