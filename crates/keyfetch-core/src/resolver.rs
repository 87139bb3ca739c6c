//! Key resolution lifecycle
//!
//! A `KeyResolver` is built once, resolves its key during construction and
//! is immutable afterwards. A literal key always short-circuits: no file is
//! opened and no request is sent, even if other sources are configured.

use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::error::KeyResult;
use crate::key::{ResolvedKey, SourceKind};
use crate::logging::{Logger, NoOpLogger, SharedLogger};
use crate::source::KeySource;
use crate::strategy::KeyStrategy;
use crate::{log_error, log_info};

/// Holds a resolved API key and the logger it was resolved with
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use keyfetch_core::{ConsoleLogger, KeyResolver, ResolverConfig};
///
/// let config = ResolverConfig::new()
///     .with_logger(Arc::new(ConsoleLogger::new()))
///     .with_api_key_location("path/to/api_key.txt");
/// let resolver = KeyResolver::from_config(&config)?;
/// let key = resolver.key().expose();
/// # Ok::<(), keyfetch_core::KeyError>(())
/// ```
pub struct KeyResolver {
    key: ResolvedKey,
    source: SourceKind,
    strategy_name: String,
    logger: SharedLogger,
}

impl KeyResolver {
    /// Resolve a key from configuration
    pub fn from_config(config: &ResolverConfig) -> KeyResult<Self> {
        let logger = config.logger();
        let source = Self::select_source(config, logger.as_ref())?;

        match source {
            KeySource::Literal(key) => Ok(Self::literal(key, logger)),
            KeySource::File(strategy) => Self::fetch_with(&strategy, logger),
            KeySource::Remote(strategy) => Self::fetch_with(&strategy, logger),
        }
    }

    /// Resolve a key from configuration without blocking an async runtime
    ///
    /// Remote fetches use the non-blocking client. File reads are small and
    /// stay synchronous.
    pub async fn from_config_async(config: &ResolverConfig) -> KeyResult<Self> {
        let logger = config.logger();
        let source = Self::select_source(config, logger.as_ref())?;

        match source {
            KeySource::Literal(key) => Ok(Self::literal(key, logger)),
            KeySource::File(strategy) => Self::fetch_with(&strategy, logger),
            KeySource::Remote(strategy) => {
                let key = strategy.fetch_async(logger.as_ref()).await?;
                Ok(Self::finish(key, strategy.kind(), strategy.name(), logger))
            }
        }
    }

    /// Resolve through a caller-supplied strategy
    ///
    /// `api_key`, when present and non-empty, is used as-is and the strategy
    /// is never asked to fetch.
    pub fn with_strategy(
        strategy: &dyn KeyStrategy,
        api_key: Option<String>,
        logger: Option<SharedLogger>,
    ) -> KeyResult<Self> {
        let logger = logger.unwrap_or_else(|| Arc::new(NoOpLogger::new()));

        match api_key.filter(|k| !k.is_empty()) {
            Some(key) => Ok(Self::literal(key, logger)),
            None => Self::fetch_with(strategy, logger),
        }
    }

    /// Resolve and return only the key
    pub fn get_api_key(config: &ResolverConfig) -> KeyResult<ResolvedKey> {
        Self::from_config(config).map(Self::into_key)
    }

    fn select_source(config: &ResolverConfig, logger: &dyn Logger) -> KeyResult<KeySource> {
        config.source().map_err(|err| {
            log_error!(logger, "Cannot resolve API key: {}", err);
            err
        })
    }

    fn literal(key: String, logger: SharedLogger) -> Self {
        Self::finish(ResolvedKey::Text(key), SourceKind::Literal, "literal", logger)
    }

    fn fetch_with(strategy: &dyn KeyStrategy, logger: SharedLogger) -> KeyResult<Self> {
        let key = strategy.fetch(logger.as_ref())?;
        Ok(Self::finish(key, strategy.kind(), strategy.name(), logger))
    }

    fn finish(key: ResolvedKey, source: SourceKind, strategy_name: &str, logger: SharedLogger) -> Self {
        log_info!(logger, "{} initialization complete (source: {})", strategy_name, source);
        Self {
            key,
            source,
            strategy_name: strategy_name.to_string(),
            logger,
        }
    }

    pub fn key(&self) -> &ResolvedKey {
        &self.key
    }

    pub fn into_key(self) -> ResolvedKey {
        self.key
    }

    /// Which kind of source produced the key
    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Name of the strategy that produced the key, `literal` for literal keys
    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn logger(&self) -> &SharedLogger {
        &self.logger
    }
}

impl std::fmt::Debug for KeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyResolver")
            .field("key", &self.key)
            .field("source", &self.source)
            .field("strategy_name", &self.strategy_name)
            .finish()
    }
}
