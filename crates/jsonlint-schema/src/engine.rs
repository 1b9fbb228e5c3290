//! # Standard Engine
//!
//! The default [`JsonEngine`]: `jsonc-parser` for parsing (see
//! [`dialect`](crate::dialect)), `jsonschema` for validation.

use std::sync::Arc;

use jsonlint_core::{CompiledSchema, ErrorDetail, ErrorKind, JsonEngine, ParserOptions};
use serde_json::Value;

use crate::dialect;
use crate::validate::{SchemaValidationError, SchemaValidator};

/// Parser and validator backed by `jsonc-parser` and `jsonschema`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEngine;

impl StandardEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

impl From<SchemaValidationError> for ErrorDetail {
    fn from(error: SchemaValidationError) -> Self {
        let kind = match error {
            SchemaValidationError::ValidationFailed { .. } => ErrorKind::Validation,
            SchemaValidationError::SchemaLoadError { .. }
            | SchemaValidationError::ValidatorBuildError { .. } => ErrorKind::SchemaLoad,
        };
        ErrorDetail::new(kind, error.to_string())
    }
}

impl JsonEngine for StandardEngine {
    fn parse(&self, text: &str, options: &ParserOptions) -> Result<Value, ErrorDetail> {
        dialect::parse(text, options)
    }

    fn compile(
        &self,
        text: &str,
        options: &ParserOptions,
    ) -> Result<Arc<dyn CompiledSchema>, ErrorDetail> {
        let schema = dialect::parse(text, options).map_err(|e| {
            SchemaValidationError::SchemaLoadError {
                reason: e.message().to_string(),
            }
        })?;
        let validator = SchemaValidator::compile(&schema, options.environment)?;
        tracing::debug!(environment = ?options.environment, "compiled schema");
        Ok(Arc::new(ParsedSchema { validator }))
    }
}

/// A compiled schema whose documents are parsed with the data's dialect.
#[derive(Debug)]
struct ParsedSchema {
    validator: SchemaValidator,
}

impl CompiledSchema for ParsedSchema {
    fn validate(&self, text: &str, options: &ParserOptions) -> Result<Value, ErrorDetail> {
        let data = dialect::parse(text, options)?;
        self.validator.validate_document(&data)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonlint_core::{LintOptions, Mode};
    use serde_json::json;

    fn parser(options: LintOptions) -> ParserOptions {
        options.resolve().parser
    }

    #[test]
    fn test_parse_error_detail_is_located() {
        let err = StandardEngine::new()
            .parse(r#"{"a":1,}"#, &parser(LintOptions::default()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.message().starts_with("Parse error"));
        assert_eq!(err.location().map(|at| at.line), Some(1));
    }

    #[test]
    fn test_parse_with_tolerance() {
        let options = parser(LintOptions {
            ignore_trailing_commas: true,
            ..LintOptions::default()
        });
        let value = StandardEngine::new().parse(r#"{"a":1,}"#, &options).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_compile_and_validate() {
        let options = parser(LintOptions::default());
        let engine = StandardEngine::new();
        let schema = engine
            .compile(r#"{"type": "object", "required": ["id"]}"#, &options)
            .unwrap();

        assert_eq!(schema.validate(r#"{"id": 7}"#, &options).unwrap(), json!({"id": 7}));

        let err = schema.validate("{}", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().starts_with("Validation failed"));
        assert!(err.location().is_none());

        let err = schema.validate("{", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_schema_parsed_with_data_dialect() {
        let text = "{\n  // ids are required\n  \"required\": [\"id\"],\n}";
        let engine = StandardEngine::new();
        let err = engine.compile(text, &parser(LintOptions::default())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaLoad);
        assert!(err.message().starts_with("Invalid schema: Parse error"));

        let json5 = parser(LintOptions {
            mode: Mode::Json5,
            ..LintOptions::default()
        });
        assert!(engine.compile(text, &json5).is_ok());
    }
}
