//! # jsonlint-core — Foundational Types for JSON Lint Pipelines
//!
//! Every other crate in the workspace depends on `jsonlint-core`; it depends
//! on nothing internal. It defines the data that flows between pipeline
//! stages and the seams at which the parser and validator plug in.
//!
//! ## Key Design Principles
//!
//! 1. **The result slot is part of the record.** [`FileRecord`] carries an
//!    optional [`LintResult`]. Stages that need one check for it and fail
//!    loudly when it is missing instead of inventing a default.
//!
//! 2. **Results are consistent by construction.** A [`LintResult`] is built
//!    only through [`LintResult::passed`] or [`LintResult::failed`], so
//!    "failed without an error" and "passed with an error" cannot exist.
//!
//! 3. **Options are resolved once.** [`LintOptions`] is the user-facing,
//!    `serde`-loadable form (unknown keys rejected); [`ResolvedOptions`] is
//!    the immutable form a stage works with, with dialect flags combined.
//!
//! 4. **Parsing is a collaborator.** [`JsonEngine`] and [`CompiledSchema`]
//!    are the only way stages reach a parser or a schema validator.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsonlint-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod engine;
pub mod error;
pub mod options;
pub mod record;
pub mod result;

// Re-export primary types for ergonomic imports.
pub use engine::{CompiledSchema, JsonEngine};
pub use error::{ConfigError, ErrorDetail, ErrorKind, Location, PipelineError, PLUGIN_NAME};
pub use options::{
    Indent, LintOptions, Mode, OutputOptions, ParserOptions, ResolvedOptions, SchemaEnvironment,
    SchemaOptions, SchemaReference,
};
pub use record::FileRecord;
pub use result::LintResult;
