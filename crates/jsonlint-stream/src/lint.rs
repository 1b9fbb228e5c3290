//! # Lint Stage
//!
//! Parses every record with the configured dialect, validates it against the
//! schema when one is configured, and attaches the outcome as a
//! [`LintResult`]. A failing file never ends the stream; it is simply
//! forwarded with a failing result.
//!
//! With `format` enabled, a passing file's content is replaced by the
//! re-serialized data: keys sorted when `sortKeys` is set, indented with the
//! resolved indent string (compact when it is empty), newline-terminated.
//! Failing files keep their original bytes.
//!
//! Records are linted concurrently up to the stage's concurrency limit and
//! emitted in input order.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use jsonlint_core::{
    ErrorDetail, ErrorKind, FileRecord, JsonEngine, LintOptions, LintResult, ResolvedOptions,
};
use jsonlint_schema::StandardEngine;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::schema_cache::{FsSchemaSource, SchemaCache, SchemaSource};

/// Files linted at once when no concurrency is configured.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Per-file parse, validate and format stage.
///
/// Cloning a stage is cheap and shares its schema cache.
#[derive(Debug, Clone)]
pub struct LintStage {
    options: Arc<ResolvedOptions>,
    engine: Arc<dyn JsonEngine>,
    source: Arc<dyn SchemaSource>,
    schema: Option<Arc<SchemaCache>>,
    concurrency: usize,
}

impl LintStage {
    /// A stage for `options` using the standard engine and file-system
    /// schema storage.
    pub fn new(options: &LintOptions) -> Self {
        Self::from_parts(
            Arc::new(options.resolve()),
            Arc::new(StandardEngine::new()),
            Arc::new(FsSchemaSource),
            DEFAULT_CONCURRENCY,
        )
    }

    fn from_parts(
        options: Arc<ResolvedOptions>,
        engine: Arc<dyn JsonEngine>,
        source: Arc<dyn SchemaSource>,
        concurrency: usize,
    ) -> Self {
        let schema = options.schema.clone().map(|reference| {
            Arc::new(SchemaCache::new(
                reference,
                options.parser.clone(),
                engine.clone(),
                source.clone(),
            ))
        });
        Self {
            options,
            engine,
            source,
            schema,
            concurrency,
        }
    }

    /// Replace the parser/validator. Starts a fresh schema cache.
    pub fn with_engine(self, engine: Arc<dyn JsonEngine>) -> Self {
        Self::from_parts(self.options, engine, self.source, self.concurrency)
    }

    /// Replace the storage the schema is read from. Starts a fresh schema
    /// cache.
    pub fn with_schema_source(self, source: Arc<dyn SchemaSource>) -> Self {
        Self::from_parts(self.options, self.engine, source, self.concurrency)
    }

    /// Lint at most `limit` files at once (at least one).
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// The resolved options this stage runs with.
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// The stage's schema cache, when a schema is configured.
    pub fn schema_cache(&self) -> Option<&SchemaCache> {
        self.schema.as_deref()
    }

    /// Lint one record and attach its result. A record that already carries
    /// a result is forwarded untouched.
    pub async fn lint_file(&self, mut record: FileRecord) -> FileRecord {
        if record.lint_result().is_some() {
            tracing::debug!(file = %record.path().display(), "record already linted");
            return record;
        }
        let outcome = match self.check(&record).await {
            Ok(data) => self.render(data),
            Err(error) => Err(error),
        };
        let result = match outcome {
            Ok(output) => {
                if let Some(output) = output {
                    record.set_contents(output);
                }
                LintResult::passed()
            }
            Err(error) => LintResult::failed(error),
        };
        tracing::debug!(
            file = %record.path().display(),
            success = result.success(),
            "linted file"
        );
        // The slot was checked empty above.
        let _ = record.attach_lint_result(result);
        record
    }

    /// Lint every record of `input`, preserving order.
    pub fn lint<S>(self, input: S) -> impl Stream<Item = FileRecord> + Send + 'static
    where
        S: Stream<Item = FileRecord> + Send + 'static,
    {
        let concurrency = self.concurrency;
        input
            .map(move |record| {
                let stage = self.clone();
                async move { stage.lint_file(record).await }
            })
            .buffered(concurrency)
    }

    async fn check(&self, record: &FileRecord) -> Result<Value, ErrorDetail> {
        let schema = match &self.schema {
            Some(cache) => Some(cache.get().await?),
            None => None,
        };
        let text = record.contents_str();
        match schema {
            Some(schema) => schema.validate(&text, &self.options.parser),
            None => self.engine.parse(&text, &self.options.parser),
        }
    }

    fn render(&self, data: Value) -> Result<Option<Vec<u8>>, ErrorDetail> {
        let output = &self.options.output;
        if !output.format {
            return Ok(None);
        }
        let data = if output.sort_keys {
            sort_keys(data)
        } else {
            data
        };
        serialize(&data, &output.indent).map(Some).map_err(|e| {
            ErrorDetail::new(ErrorKind::Output, format!("Cannot serialize output: {e}"))
        })
    }
}

/// `value` with the keys of every object, at every depth, in byte order.
/// Array element order is untouched.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Serialize `data` with `indent` per nesting level (compact when empty),
/// followed by a newline.
fn serialize(data: &Value, indent: &str) -> serde_json::Result<Vec<u8>> {
    let mut out = if indent.is_empty() {
        serde_json::to_vec(data)?
    } else {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        data.serialize(&mut ser)?;
        buf
    };
    out.push(b'\n');
    Ok(out)
}
