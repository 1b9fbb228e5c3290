//! # Formatter and Reporter Registry
//!
//! A failing file is rendered in two parts: a *formatter* produces a header
//! line naming the file and position, and a *reporter* renders the error
//! body. Both are selected by name from configuration or supplied as
//! functions.
//!
//! | Formatter | Output                                                   |
//! |-----------|----------------------------------------------------------|
//! | `prose`   | `File <path> failed JSON validation at line L, column C.` |
//! | `msbuild` | `<path>(L,C): error: failed JSON validation`              |
//!
//! | Reporter    | Output                                                 |
//! |-------------|--------------------------------------------------------|
//! | `exception` | the error message without its location header          |
//! | `jshint`    | `<path>: line L, col C, <reason>` per reported problem |
//!
//! `msbuild` is also registered as `visual-studio` and `vs`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use jsonlint_core::{ConfigError, ErrorDetail};

/// A user-supplied rendering function, given the project-relative path and
/// the error.
pub type RenderFn = Arc<dyn Fn(&str, &ErrorDetail) -> String + Send + Sync>;

/// Header renderer for a failing file.
#[derive(Clone, Default)]
pub enum Formatter {
    /// Sentence-style header.
    #[default]
    Prose,
    /// Visual Studio / MSBuild diagnostic line.
    MsBuild,
    /// User-supplied function.
    Custom(RenderFn),
}

impl Formatter {
    /// Wrap a function as a formatter.
    pub fn custom(render: impl Fn(&str, &ErrorDetail) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(render))
    }

    /// Registered name, or `custom`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Prose => "prose",
            Self::MsBuild => "msbuild",
            Self::Custom(_) => "custom",
        }
    }

    /// Render the header for `path`.
    pub fn format(&self, path: &str, error: &ErrorDetail) -> String {
        match self {
            Self::Prose => prose(path, error),
            Self::MsBuild => msbuild(path, error),
            Self::Custom(render) => render(path, error),
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Formatter({})", self.name())
    }
}

impl FromStr for Formatter {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "prose" => Ok(Self::Prose),
            "msbuild" | "visual-studio" | "vs" => Ok(Self::MsBuild),
            other => Err(ConfigError::UnknownFormatter(other.to_string())),
        }
    }
}

/// Body renderer for a failing file.
#[derive(Clone, Default)]
pub enum Reporter {
    /// The message as the parser or validator wrote it.
    #[default]
    Exception,
    /// One compact line per problem.
    JsHint,
    /// User-supplied function.
    Custom(RenderFn),
}

impl Reporter {
    /// Wrap a function as a reporter.
    pub fn custom(render: impl Fn(&str, &ErrorDetail) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(render))
    }

    /// Registered name, or `custom`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exception => "exception",
            Self::JsHint => "jshint",
            Self::Custom(_) => "custom",
        }
    }

    /// Render the body for `path`.
    pub fn report(&self, path: &str, error: &ErrorDetail) -> String {
        match self {
            Self::Exception => exception(error),
            Self::JsHint => jshint(path, error),
            Self::Custom(render) => render(path, error),
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reporter({})", self.name())
    }
}

impl FromStr for Reporter {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "exception" => Ok(Self::Exception),
            "jshint" => Ok(Self::JsHint),
            other => Err(ConfigError::UnknownReporter(other.to_string())),
        }
    }
}

fn prose(path: &str, error: &ErrorDetail) -> String {
    match error.location() {
        Some(at) => format!(
            "File {path} failed JSON validation at line {}, column {}.",
            at.line, at.column
        ),
        None => format!("File {path} failed JSON validation."),
    }
}

fn msbuild(path: &str, error: &ErrorDetail) -> String {
    match error.location() {
        Some(at) => format!("{path}({},{}): error: failed JSON validation", at.line, at.column),
        None => format!("{path}: error: failed JSON validation"),
    }
}

// Messages longer than two lines open with a location header that the
// formatter already rendered.
fn exception(error: &ErrorDetail) -> String {
    let lines: Vec<&str> = error.message().lines().collect();
    if lines.len() > 2 {
        lines[1..].join("\n")
    } else {
        error.message().to_string()
    }
}

fn jshint(path: &str, error: &ErrorDetail) -> String {
    if let Some(at) = error.location() {
        return format!("{path}: line {}, col {}, {}", at.line, at.column, error.reason());
    }
    let mut lines = error.message().lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next().unwrap_or_default();
    let problems: Vec<String> = lines.map(|problem| format!("{path}: {problem}")).collect();
    if problems.is_empty() {
        format!("{path}: {first}")
    } else {
        problems.join("\n")
    }
}
