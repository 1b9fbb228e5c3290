//! # Options — User Configuration and Its Resolved Form
//!
//! [`LintOptions`] is what a caller writes, in code or in a JSON/YAML file.
//! Every key has a default and unknown keys are rejected, so a misspelled
//! option is a [`ConfigError`] instead of a silently ignored setting.
//!
//! [`LintOptions::resolve`] turns it into [`ResolvedOptions`], the immutable
//! form a stage is built from. Resolution is where dialect flags are
//! OR-combined: `mode: json5` implies comment, trailing-comma and
//! single-quote tolerance; `mode: cjson` (or the legacy `cjson: true` flag)
//! implies comment tolerance.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest indentation accepted for re-serialized output.
pub const MAX_INDENT: usize = 10;

/// JSON grammar variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Standard JSON.
    #[default]
    Json,
    /// JSON with comments.
    Cjson,
    /// JSON5.
    Json5,
}

/// JSON Schema draft used to compile the schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaEnvironment {
    /// Draft 4.
    #[serde(rename = "json-schema-draft-04", alias = "draft-04")]
    Draft04,
    /// Draft 6.
    #[serde(rename = "json-schema-draft-06", alias = "draft-06")]
    Draft06,
    /// Draft 7.
    #[serde(rename = "json-schema-draft-07", alias = "draft-07")]
    Draft07,
    /// Draft 2019-09.
    #[serde(rename = "json-schema-draft-2019-09", alias = "draft-2019-09")]
    Draft201909,
    /// Draft 2020-12.
    #[serde(rename = "json-schema-draft-2020-12", alias = "draft-2020-12")]
    Draft202012,
}

impl SchemaEnvironment {
    /// The canonical tag of this environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft04 => "json-schema-draft-04",
            Self::Draft06 => "json-schema-draft-06",
            Self::Draft07 => "json-schema-draft-07",
            Self::Draft201909 => "json-schema-draft-2019-09",
            Self::Draft202012 => "json-schema-draft-2020-12",
        }
    }
}

impl fmt::Display for SchemaEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indentation of re-serialized output: a count of spaces or a literal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Indent {
    /// This many spaces per level (capped at [`MAX_INDENT`]).
    Spaces(usize),
    /// This string per level (truncated to [`MAX_INDENT`] characters).
    Text(String),
}

impl Default for Indent {
    fn default() -> Self {
        Self::Spaces(2)
    }
}

impl Indent {
    /// The per-level indentation string. Empty means compact output.
    pub fn resolve(&self) -> String {
        match self {
            Self::Spaces(count) => " ".repeat((*count).min(MAX_INDENT)),
            Self::Text(text) => text.chars().take(MAX_INDENT).collect(),
        }
    }
}

/// Schema selection. Both keys are optional; without `src` no schema
/// validation happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SchemaOptions {
    /// Path of the schema document.
    pub src: Option<PathBuf>,
    /// Draft to compile the schema with; detected from `$schema` when absent.
    pub environment: Option<SchemaEnvironment>,
}

/// User-supplied lint options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LintOptions {
    /// Grammar variant.
    pub mode: Mode,
    /// Accept comments.
    pub ignore_comments: bool,
    /// Accept trailing commas.
    pub ignore_trailing_commas: bool,
    /// Accept single-quoted strings.
    pub allow_single_quoted_strings: bool,
    /// Accept repeated object keys.
    pub allow_duplicate_object_keys: bool,
    /// Legacy spelling of `ignoreComments`.
    pub cjson: bool,
    /// Schema validation settings.
    pub schema: SchemaOptions,
    /// Re-serialize passing files and overwrite their content.
    pub format: bool,
    /// Indentation for re-serialized output.
    pub indent: Indent,
    /// Sort object keys before re-serializing.
    pub sort_keys: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Json,
            ignore_comments: false,
            ignore_trailing_commas: false,
            allow_single_quoted_strings: false,
            allow_duplicate_object_keys: true,
            cjson: false,
            schema: SchemaOptions::default(),
            format: false,
            indent: Indent::default(),
            sort_keys: false,
        }
    }
}

impl LintOptions {
    /// Deserialize options from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` on malformed text, wrong types or unknown keys.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Deserialize options from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Yaml` on malformed text, wrong types or unknown keys.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load options from a file, choosing the format from the extension
    /// (`.yaml`/`.yml` for YAML, anything else for JSON).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// format-specific deserialization error.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Combine the dialect flags and split the options into the parts each
    /// stage consumes.
    pub fn resolve(&self) -> ResolvedOptions {
        let json5 = self.mode == Mode::Json5;
        ResolvedOptions {
            parser: ParserOptions {
                mode: self.mode,
                ignore_comments: self.ignore_comments
                    || self.cjson
                    || self.mode == Mode::Cjson
                    || json5,
                ignore_trailing_commas: self.ignore_trailing_commas || json5,
                allow_single_quoted_strings: self.allow_single_quoted_strings || json5,
                allow_duplicate_object_keys: self.allow_duplicate_object_keys,
                environment: self.schema.environment,
            },
            output: OutputOptions {
                format: self.format,
                indent: self.indent.resolve(),
                sort_keys: self.sort_keys,
            },
            schema: self.schema.src.as_ref().map(|path| SchemaReference {
                path: path.clone(),
                environment: self.schema.environment,
            }),
        }
    }
}

/// Options handed to the parser and validator, shared by data and schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Grammar variant.
    pub mode: Mode,
    /// Accept comments.
    pub ignore_comments: bool,
    /// Accept trailing commas.
    pub ignore_trailing_commas: bool,
    /// Accept single-quoted strings.
    pub allow_single_quoted_strings: bool,
    /// Accept repeated object keys.
    pub allow_duplicate_object_keys: bool,
    /// Schema draft.
    pub environment: Option<SchemaEnvironment>,
}

/// How passing files are re-serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Overwrite content with the re-serialized data.
    pub format: bool,
    /// Per-level indentation; empty for compact output.
    pub indent: String,
    /// Sort object keys first.
    pub sort_keys: bool,
}

/// A schema to validate every file against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReference {
    /// Path of the schema document.
    pub path: PathBuf,
    /// Draft to compile it with.
    pub environment: Option<SchemaEnvironment>,
}

/// Options after defaulting and flag combination; immutable per stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Parser and validator options.
    pub parser: ParserOptions,
    /// Output formatting options.
    pub output: OutputOptions,
    /// Schema to validate against, if any.
    pub schema: Option<SchemaReference>,
}
