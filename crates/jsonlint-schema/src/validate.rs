//! # Schema Validation
//!
//! Compiles a schema document with the `jsonschema` crate and validates
//! parsed data against it, collecting every violation with its instance
//! path.
//!
//! ## Draft Selection
//!
//! The lint options' environment picks the draft explicitly. Without one,
//! the draft is detected from the schema's `$schema` keyword.
//!
//! ## Reference Resolution
//!
//! Internal `$ref`s (`#/definitions/<name>`) are resolved by the jsonschema
//! crate natively. External references are resolved by
//! [`LocalSchemaRetriever`]: `file://` URIs are read from local storage, and
//! every other URI is refused so that validation never touches the network.

use std::fmt;
use std::path::Path;

use jsonlint_core::SchemaEnvironment;
use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

/// Prefix of references that are read from local storage.
const FILE_URI_PREFIX: &str = "file://";

/// Resolves external `$ref` URIs from local files only.
struct LocalSchemaRetriever;

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let Some(path) = uri_str.strip_prefix(FILE_URI_PREFIX) else {
            return Err(format!("remote schema references are not fetched: {uri_str}").into());
        };
        // Fragments are resolved by the caller against the returned document.
        let path = path.split('#').next().unwrap_or(path);
        let content = std::fs::read_to_string(Path::new(path))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Error during schema compilation or validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("Validation failed:\n{violations}")]
    ValidationFailed {
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The schema text could not be parsed.
    #[error("Invalid schema: {reason}")]
    SchemaLoadError {
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("Invalid schema: {reason}")]
    ValidatorBuildError {
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled schema backed by the `jsonschema` crate.
///
/// `SchemaValidator` is `Send + Sync`; one instance is shared by every file
/// validated in a stream.
pub struct SchemaValidator {
    validator: Validator,
    environment: Option<SchemaEnvironment>,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile `schema` under `environment`, or under the draft its
    /// `$schema` keyword names when no environment is given.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidatorBuildError` if the schema is
    /// not valid for the draft or references a schema that cannot be resolved.
    pub fn compile(
        schema: &Value,
        environment: Option<SchemaEnvironment>,
    ) -> Result<Self, SchemaValidationError> {
        let mut opts = jsonschema::options();
        if let Some(environment) = environment {
            opts.with_draft(draft_for(environment));
        }
        opts.with_retriever(LocalSchemaRetriever);

        let validator = opts.build(schema).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            validator,
            environment,
        })
    }

    /// The environment the schema was compiled with, if one was selected.
    pub fn environment(&self) -> Option<SchemaEnvironment> {
        self.environment
    }

    /// Validate a parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` with structured
    /// violation details if the document is invalid.
    pub fn validate_document(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let errors: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                violations: ValidationViolations { violations: errors },
            })
        }
    }
}

fn draft_for(environment: SchemaEnvironment) -> Draft {
    match environment {
        SchemaEnvironment::Draft04 => Draft::Draft4,
        SchemaEnvironment::Draft06 => Draft::Draft6,
        SchemaEnvironment::Draft07 => Draft::Draft7,
        SchemaEnvironment::Draft201909 => Draft::Draft201909,
        SchemaEnvironment::Draft202012 => Draft::Draft202012,
    }
}
