//! # Lint Result — Per-File Outcome
//!
//! Exactly one [`LintResult`] is attached to each record by the lint stage.
//! After that it is read-only state for every downstream stage.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::ErrorDetail;

/// Outcome of linting one file.
///
/// # Invariants
///
/// - `success()` is `false` exactly when `error()` and `message()` are
///   present. Both constructors uphold this and the fields are private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintResult {
    error: Option<ErrorDetail>,
}

impl LintResult {
    /// The file parsed (and validated, when a schema is configured).
    pub fn passed() -> Self {
        Self { error: None }
    }

    /// The file failed with `error`.
    pub fn failed(error: ErrorDetail) -> Self {
        Self { error: Some(error) }
    }

    /// Whether the file passed.
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// Whether the file failed.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&ErrorDetail> {
        self.error.as_ref()
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        self.error.as_ref().map(ErrorDetail::message)
    }
}

impl<T> From<Result<T, ErrorDetail>> for LintResult {
    fn from(outcome: Result<T, ErrorDetail>) -> Self {
        match outcome {
            Ok(_) => Self::passed(),
            Err(error) => Self::failed(error),
        }
    }
}

impl Serialize for LintResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.error.is_some() { 3 } else { 1 };
        let mut state = serializer.serialize_struct("LintResult", fields)?;
        state.serialize_field("success", &self.success())?;
        if let Some(error) = &self.error {
            state.serialize_field("error", error)?;
            state.serialize_field("message", error.message())?;
        }
        state.end()
    }
}
