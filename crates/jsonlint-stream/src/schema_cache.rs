//! # Schema Coalescing
//!
//! A lint stage validates every file against the same schema document. The
//! [`SchemaCache`] makes sure that document is read from storage and
//! compiled at most once for the stage's lifetime:
//!
//! - The first request starts the load.
//! - Requests that arrive while the load is in flight wait for it instead of
//!   starting their own (single flight).
//! - The outcome is kept, failures included. Schema paths are static per
//!   configuration, so a missing or invalid schema fails every file the same
//!   way without touching storage again.
//!
//! The load runs on its own task. A requester that gives up (its stream is
//! dropped, or a timeout fires) does not cancel it: the load finishes, its
//! outcome is kept, and later requests reuse it without reading again.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use jsonlint_core::{
    CompiledSchema, ErrorDetail, ErrorKind, JsonEngine, ParserOptions, SchemaReference,
};

/// Storage the schema document is read from.
#[async_trait]
pub trait SchemaSource: Send + Sync + fmt::Debug {
    /// Read the document at `path` as text.
    async fn read(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads schema documents from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSchemaSource;

#[async_trait]
impl SchemaSource for FsSchemaSource {
    async fn read(&self, path: &Path) -> std::io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

type SchemaOutcome = Result<Arc<dyn CompiledSchema>, ErrorDetail>;
type SharedLoad = Shared<BoxFuture<'static, SchemaOutcome>>;

/// The memoized schema of one lint stage.
pub struct SchemaCache {
    reference: SchemaReference,
    parser: ParserOptions,
    engine: Arc<dyn JsonEngine>,
    source: Arc<dyn SchemaSource>,
    load: OnceLock<SharedLoad>,
    outcome: Arc<OnceLock<SchemaOutcome>>,
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("reference", &self.reference)
            .field("engine", &self.engine)
            .field("source", &self.source)
            .field("started", &self.load.get().is_some())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl SchemaCache {
    /// An empty cache for `reference`, compiled by `engine` with `parser`
    /// options after reading it from `source`.
    pub fn new(
        reference: SchemaReference,
        parser: ParserOptions,
        engine: Arc<dyn JsonEngine>,
        source: Arc<dyn SchemaSource>,
    ) -> Self {
        Self {
            reference,
            parser,
            engine,
            source,
            load: OnceLock::new(),
            outcome: Arc::new(OnceLock::new()),
        }
    }

    /// Path of the schema document.
    pub fn path(&self) -> &Path {
        &self.reference.path
    }

    /// Whether a load has completed (successfully or not).
    pub fn is_loaded(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// The compiled schema, loading it on first use.
    ///
    /// Must be called from within a Tokio runtime; the first call spawns the
    /// load.
    ///
    /// # Errors
    ///
    /// Returns an `ErrorKind::SchemaLoad` detail if the document cannot be
    /// read or compiled. The same error is returned to every later caller.
    pub async fn get(&self) -> SchemaOutcome {
        if let Some(outcome) = self.outcome.get() {
            return outcome.clone();
        }
        self.load.get_or_init(|| self.start()).clone().await
    }

    fn start(&self) -> SharedLoad {
        let path = self.reference.path.clone();
        let task = tokio::spawn(load(
            path.clone(),
            self.parser.clone(),
            Arc::clone(&self.engine),
            Arc::clone(&self.source),
            Arc::clone(&self.outcome),
        ));
        async move {
            task.await.unwrap_or_else(|e| {
                Err(ErrorDetail::new(
                    ErrorKind::SchemaLoad,
                    format!("Schema load for '{}' did not finish: {e}", path.display()),
                ))
            })
        }
        .boxed()
        .shared()
    }
}

async fn load(
    path: PathBuf,
    parser: ParserOptions,
    engine: Arc<dyn JsonEngine>,
    source: Arc<dyn SchemaSource>,
    outcome: Arc<OnceLock<SchemaOutcome>>,
) -> SchemaOutcome {
    let result = read_and_compile(&path, &parser, engine.as_ref(), source.as_ref()).await;
    outcome.get_or_init(|| result).clone()
}

async fn read_and_compile(
    path: &Path,
    parser: &ParserOptions,
    engine: &dyn JsonEngine,
    source: &dyn SchemaSource,
) -> SchemaOutcome {
    let text = source.read(path).await.map_err(|e| {
        tracing::warn!(schema = %path.display(), error = %e, "cannot read schema");
        ErrorDetail::new(
            ErrorKind::SchemaLoad,
            format!("Cannot read schema '{}': {e}", path.display()),
        )
    })?;
    match engine.compile(&text, parser) {
        Ok(schema) => {
            tracing::info!(schema = %path.display(), "loaded schema");
            Ok(schema)
        }
        Err(error) => {
            tracing::warn!(schema = %path.display(), error = %error.reason(), "cannot compile schema");
            Err(error)
        }
    }
}
