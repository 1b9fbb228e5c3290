//! # Parser Collaborator Traits
//!
//! The lint stage never parses JSON itself. It reaches a parser and a schema
//! validator through these two traits, and every failure they report is an
//! [`ErrorDetail`] so that it can be stored in a lint result as-is.
//!
//! Implementations must be pure with respect to the stage: the same text and
//! options always yield the same outcome, and no implementation may keep
//! per-stream state. Schema content caching is the stage's job.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ErrorDetail;
use crate::options::ParserOptions;

/// A JSON-family parser that can also compile schemas.
pub trait JsonEngine: Send + Sync + fmt::Debug {
    /// Parse `text` under the dialect described by `options`.
    ///
    /// # Errors
    ///
    /// Returns an `ErrorKind::Parse` detail, located when possible.
    fn parse(&self, text: &str, options: &ParserOptions) -> Result<Value, ErrorDetail>;

    /// Compile schema `text` into a reusable validator.
    ///
    /// The schema document is parsed with the same `options` as the data.
    ///
    /// # Errors
    ///
    /// Returns an `ErrorKind::SchemaLoad` detail when the schema is malformed
    /// or is not a valid schema for the selected environment.
    fn compile(
        &self,
        text: &str,
        options: &ParserOptions,
    ) -> Result<Arc<dyn CompiledSchema>, ErrorDetail>;
}

/// A schema ready to validate documents.
pub trait CompiledSchema: Send + Sync + fmt::Debug {
    /// Parse `text` and validate the data against the schema.
    ///
    /// Returns the parsed data on success so that the caller can re-serialize
    /// it without parsing twice.
    ///
    /// # Errors
    ///
    /// Returns an `ErrorKind::Parse` detail when `text` is malformed and an
    /// `ErrorKind::Validation` detail when the data violates the schema.
    fn validate(&self, text: &str, options: &ParserOptions) -> Result<Value, ErrorDetail>;
}
