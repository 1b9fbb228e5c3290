//! # jsonlint-schema — Parsing, Schema Validation & Standard Engine
//!
//! Provides the parser and validator that lint stages consume through the
//! `jsonlint_core::JsonEngine` seam.
//!
//! ## Dialect Parsing (`dialect`)
//!
//! Parses JSON, CJSON and JSON5 text with `jsonc-parser`, translating
//! resolved parser options into its tolerances, detecting duplicate keys and
//! rendering located `Parse error on line L, column C:` diagnostics.
//!
//! ## Schema Validation (`validate`)
//!
//! [`SchemaValidator`] compiles one schema document under a selected JSON
//! Schema draft and reports every violation of a document with its instance
//! path.
//!
//! ## Standard Engine (`engine`)
//!
//! [`StandardEngine`] parses data and schema text with the same dialect and
//! validates with [`SchemaValidator`]. Every failure is converted into a
//! `jsonlint_core::ErrorDetail`, located when the parser knows the position.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsonlint-core` internally.
//! - Schema references never reach the network.

pub mod dialect;
pub mod engine;
pub mod validate;

pub use dialect::{parse, parse_options};
pub use engine::StandardEngine;
pub use validate::{SchemaValidationError, SchemaValidator, ValidationViolations, Violation};
