//! # Report Stage
//!
//! Observes lint results and writes a human-readable report for every
//! failing record to a [`ReportSink`]. Passing records produce no output.
//! The stage never touches a record or its result: every record is forwarded
//! unchanged and in order.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::{Stream, StreamExt};
use jsonlint_core::{ConfigError, FileRecord, LintResult};
use serde::{Deserialize, Serialize};

use crate::registry::{Formatter, Reporter};

/// A whole-record reporting function. It is called only for failing
/// records; the failure is available through
/// [`FileRecord::lint_result`].
pub type CompleteReportFn = Arc<dyn Fn(&FileRecord) -> String + Send + Sync>;

/// How a failing record is rendered.
#[derive(Clone, Default)]
pub enum ReporterConfig {
    /// `Error on file <path>` followed by the full message.
    #[default]
    Default,
    /// A caller-supplied function given the whole record.
    Complete(CompleteReportFn),
    /// A formatter header and a reporter body, both given the
    /// project-relative path, emitted together as one report.
    Split {
        /// Header renderer.
        formatter: Formatter,
        /// Body renderer.
        reporter: Reporter,
    },
}

impl ReporterConfig {
    /// Wrap a whole-record function.
    pub fn complete(report: impl Fn(&FileRecord) -> String + Send + Sync + 'static) -> Self {
        Self::Complete(Arc::new(report))
    }

    /// Pair a formatter with a reporter.
    pub fn split(formatter: Formatter, reporter: Reporter) -> Self {
        Self::Split {
            formatter,
            reporter,
        }
    }
}

impl fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Complete(_) => f.write_str("Complete(..)"),
            Self::Split {
                formatter,
                reporter,
            } => f
                .debug_struct("Split")
                .field("formatter", formatter)
                .field("reporter", reporter)
                .finish(),
        }
    }
}

/// Serializable selection of built-ins by name.
///
/// Missing names default to `prose` and `exception`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ReporterSelection {
    /// Formatter name.
    pub formatter: Option<String>,
    /// Reporter name.
    pub reporter: Option<String>,
}

impl TryFrom<ReporterSelection> for ReporterConfig {
    type Error = ConfigError;

    fn try_from(selection: ReporterSelection) -> Result<Self, Self::Error> {
        let formatter = match selection.formatter {
            Some(name) => name.parse()?,
            None => Formatter::default(),
        };
        let reporter = match selection.reporter {
            Some(name) => name.parse()?,
            None => Reporter::default(),
        };
        Ok(Self::split(formatter, reporter))
    }
}

/// Destination of rendered reports.
pub trait ReportSink: Send + Sync + fmt::Debug {
    /// Write one report.
    fn emit(&self, report: &str);
}

/// Emits reports as `tracing` error events under the `jsonlint` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&self, report: &str) {
        tracing::error!(target: "jsonlint", "{report}");
    }
}

/// Keeps reports in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports emitted so far, oldest first.
    pub fn reports(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, report: &str) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.to_string());
    }
}

/// Side-effecting observer of lint results.
#[derive(Debug, Clone)]
pub struct ReportStage {
    config: ReporterConfig,
    sink: Arc<dyn ReportSink>,
    base_dir: Option<PathBuf>,
}

impl Default for ReportStage {
    fn default() -> Self {
        Self::new(ReporterConfig::Default)
    }
}

impl ReportStage {
    /// A stage rendering with `config` into a [`TracingSink`].
    pub fn new(config: ReporterConfig) -> Self {
        Self {
            config,
            sink: Arc::new(TracingSink),
            base_dir: None,
        }
    }

    /// Write reports to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Render paths relative to `dir` rather than to each record's base.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// The path shown to formatters and reporters.
    pub fn display_path(&self, record: &FileRecord) -> String {
        self.base_dir
            .as_deref()
            .and_then(|dir| record.path().strip_prefix(dir).ok())
            .unwrap_or_else(|| record.relative())
            .display()
            .to_string()
    }

    /// Emit the report for one record, if it failed.
    pub fn observe(&self, record: &FileRecord) {
        let Some(error) = record.lint_result().and_then(LintResult::error) else {
            return;
        };
        match &self.config {
            ReporterConfig::Default => {
                self.sink
                    .emit(&format!("Error on file {}", record.path().display()));
                self.sink.emit(error.message());
            }
            ReporterConfig::Complete(report) => self.sink.emit(&report(record)),
            ReporterConfig::Split {
                formatter,
                reporter,
            } => {
                let path = self.display_path(record);
                self.sink.emit(&format!(
                    "{}\n{}",
                    formatter.format(&path, error),
                    reporter.report(&path, error)
                ));
            }
        }
    }

    /// Observe every record of `input` and forward it unchanged.
    pub fn report<S>(self, input: S) -> impl Stream<Item = FileRecord> + Send + 'static
    where
        S: Stream<Item = FileRecord> + Send + 'static,
    {
        input.inspect(move |record| self.observe(record))
    }
}
