//! # jsonlint-stream — Streaming JSON Lint Stages
//!
//! Stages that run a JSON parser/validator over a stream of
//! [`FileRecord`](jsonlint_core::FileRecord)s and surface the outcome.
//! Each stage is a function from a `Stream` of records to a new stream, so a
//! caller composes only the stages it needs:
//!
//! ```text
//! files ─▶ LintStage ─▶ [ReportStage] ─▶ [fail_on_error | fail_after_error]
//! ```
//!
//! - [`LintStage`] parses (and optionally schema-validates and re-formats)
//!   every record and attaches a [`LintResult`](jsonlint_core::LintResult).
//!   Failures are data at this point; the stream keeps going.
//! - [`SchemaCache`] reads and compiles the configured schema at most once
//!   per lint stage, however many files are in flight.
//! - [`ReportStage`] renders failures through the formatter/reporter
//!   registry into a [`ReportSink`] and forwards every record unchanged.
//! - [`fail_on_error`] turns the first failure into a stream error;
//!   [`fail_after_error`] counts failures and raises one aggregate error
//!   when the input ends.
//! - [`Pipeline`] wires the stages together and drains the result.
//!
//! ## Crate Policy
//!
//! - No stage drops, duplicates or reorders records.
//! - JSON is reached only through `jsonlint_core::JsonEngine`; the default
//!   engine is `jsonlint_schema::StandardEngine`.
//! - Schema caches are owned by one lint stage and never shared across
//!   pipelines.

pub mod fail;
pub mod lint;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod schema_cache;

pub use fail::{fail_after_error, fail_on_error};
pub use lint::LintStage;
pub use pipeline::{FailureMode, Pipeline, PipelineOutcome};
pub use registry::{Formatter, Reporter};
pub use report::{MemorySink, ReportSink, ReportStage, ReporterConfig, ReporterSelection, TracingSink};
pub use schema_cache::{FsSchemaSource, SchemaCache, SchemaSource};
