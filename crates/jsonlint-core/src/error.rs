//! # Error Types — Structured Error Hierarchy
//!
//! Two families of errors exist and they never mix:
//!
//! - **Per-file failures** ([`ErrorDetail`]): parse errors, validation
//!   errors and schema load errors. They are data. The lint stage captures
//!   them into a [`LintResult`](crate::LintResult) and keeps the stream going.
//! - **Stream-level errors** ([`PipelineError`]): raised by the failure
//!   stages, either for one file (fail fast), once at stream end (fail at
//!   end), or when a stage is placed where its precondition cannot hold.
//!
//! Configuration problems are reported as [`ConfigError`] before any stream
//! exists.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Tag carried by every stream-level error, naming the producing plugin.
pub const PLUGIN_NAME: &str = "jsonlint";

/// Which stage of linting a per-file failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Malformed text under the configured dialect.
    Parse,
    /// Well-formed data that violates the schema.
    Validation,
    /// The schema could not be read, parsed or compiled.
    SchemaLoad,
    /// The validated data could not be serialized back to text.
    Output,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parse => "parse",
            Self::Validation => "validation",
            Self::SchemaLoad => "schema-load",
            Self::Output => "output",
        })
    }
}

/// 1-based position in the linted source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number in characters, starting at 1.
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A per-file failure as reported by the parser or validator.
///
/// Stages read only the message and the optional location; everything else
/// about the failure belongs to the collaborator that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ErrorDetail {
    kind: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
}

impl ErrorDetail {
    /// A failure without a source location.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Attach the source position the failure refers to.
    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.location = Some(Location { line, column });
        self
    }

    /// Which stage of linting failed.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable, possibly multi-line, description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Position in the source text, when the collaborator knows it.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// The last line of the message, which names the cause without the
    /// location header and source excerpt.
    pub fn reason(&self) -> &str {
        self.message
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or(&self.message)
    }
}

/// Error raised across a stage boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// One file failed linting and the fail-fast stage saw it.
    #[error("{message}")]
    FileFailed {
        /// Path of the failing file.
        path: PathBuf,
        /// The lint failure message.
        message: String,
    },

    /// The fail-at-end stage counted failures over the whole stream.
    #[error("Failed with {count} {}", error_noun(.count))]
    Aggregate {
        /// Number of failing files.
        count: usize,
    },

    /// A stage that needs a lint result received a record without one.
    #[error("{stage} received '{}' without a lint result; place it after the lint stage", .path.display())]
    StageMisuse {
        /// Name of the misplaced stage.
        stage: &'static str,
        /// Path of the record that revealed the misuse.
        path: PathBuf,
    },
}

impl PipelineError {
    /// Error name tag, as surfaced to the caller.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FileFailed { .. } | Self::Aggregate { .. } => "JSONLintError",
            Self::StageMisuse { .. } => "StageMisuseError",
        }
    }

    /// Name of the plugin that raised the error.
    pub fn plugin(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// The offending file, for errors about a single file.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::FileFailed { path, .. } | Self::StageMisuse { path, .. } => Some(path),
            Self::Aggregate { .. } => None,
        }
    }
}

fn error_noun(count: &usize) -> &'static str {
    if *count == 1 {
        "error"
    } else {
        "errors"
    }
}

/// Error while loading or interpreting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON options could not be deserialized (includes unknown keys).
    #[error("invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML options could not be deserialized (includes unknown keys).
    #[error("invalid YAML options: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The options file could not be read.
    #[error("cannot read options file '{}': {source}", .path.display())]
    Io {
        /// Path of the options file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A formatter was selected by a name that is not registered.
    #[error("unknown formatter '{0}' (expected one of: prose, msbuild)")]
    UnknownFormatter(String),

    /// A reporter was selected by a name that is not registered.
    #[error("unknown reporter '{0}' (expected one of: exception, jshint)")]
    UnknownReporter(String),
}
