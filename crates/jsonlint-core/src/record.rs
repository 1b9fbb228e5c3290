//! # File Record — One Unit of Pipeline Work
//!
//! A record is a path, a content buffer and an extension slot for the lint
//! result. The content buffer is replaced by the lint stage only when output
//! formatting is enabled and the file passed.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::result::LintResult;

/// A file flowing through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    base: Option<PathBuf>,
    contents: Vec<u8>,
    lint: Option<LintResult>,
}

impl FileRecord {
    /// A record for `path` holding `contents`.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            base: None,
            contents: contents.into(),
            lint: None,
        }
    }

    /// Read `path` from storage into a new record.
    ///
    /// # Errors
    ///
    /// Returns the IO error if the file cannot be read.
    pub async fn read(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let contents = tokio::fs::read(&path).await?;
        Ok(Self::new(path, contents))
    }

    /// Set the directory that [`relative`](Self::relative) is computed against.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Full path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base directory, if one was set.
    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// Path relative to the base directory, or the full path when no base is
    /// set or the base is not a prefix of the path.
    pub fn relative(&self) -> &Path {
        self.base
            .as_deref()
            .and_then(|base| self.path.strip_prefix(base).ok())
            .unwrap_or(&self.path)
    }

    /// Raw content bytes.
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Content decoded as UTF-8, with invalid sequences replaced.
    pub fn contents_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }

    /// Replace the content buffer.
    pub fn set_contents(&mut self, contents: impl Into<Vec<u8>>) {
        self.contents = contents.into();
    }

    /// The attached lint result, if a lint stage has seen this record.
    pub fn lint_result(&self) -> Option<&LintResult> {
        self.lint.as_ref()
    }

    /// Attach the lint result. Called by the lint stage.
    ///
    /// A result is attached at most once. If one is already present it is
    /// kept and `result` is handed back as the error.
    #[doc(hidden)]
    pub fn attach_lint_result(&mut self, result: LintResult) -> Result<(), LintResult> {
        if self.lint.is_some() {
            return Err(result);
        }
        self.lint = Some(result);
        Ok(())
    }
}
