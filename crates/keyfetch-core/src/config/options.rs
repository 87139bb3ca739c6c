//! Resolver options

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{KeyError, KeyResult};
use crate::logging::{ConsoleLogger, LogLevel, NoOpLogger, SharedLogger};
use crate::source::KeySource;
use crate::strategy::{FileKeyStrategy, FileMode, RemoteKeyStrategy, DEFAULT_TIMEOUT};

/// Options recognized by `KeyResolver`
///
/// Exactly one source is used, in this order:
/// 1. `api_key` (literal, never fetched)
/// 2. `base_url` + `create_key_endpoint` (remote, with `username`/`password`)
/// 3. `api_key_location` (file, with `file_mode` and `json_key`)
///
/// Empty strings and empty paths count as absent.
///
/// # Example
///
/// ```
/// use keyfetch_core::{FileMode, ResolverConfig};
///
/// let config = ResolverConfig::new()
///     .with_api_key_location("/etc/myapp/credentials.json")
///     .with_file_mode(FileMode::Json)
///     .with_json_key("api_key");
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub api_key: Option<String>,
    pub api_key_location: Option<PathBuf>,
    pub file_mode: Option<FileMode>,
    pub json_key: Option<String>,
    pub base_url: Option<String>,
    pub create_key_endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Remote request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Remote request timeout in milliseconds, takes precedence over `timeout_secs`
    pub timeout_ms: Option<u64>,
    /// Log to stdout/stderr when no logger is attached
    pub console_log: bool,
    /// Minimum level for console logging, `info` by default
    pub log_level: Option<LogLevel>,
    #[serde(skip)]
    logger: Option<SharedLogger>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_key_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.api_key_location = Some(location.into());
        self
    }

    pub fn with_file_mode(mut self, mode: FileMode) -> Self {
        self.file_mode = Some(mode);
        self
    }

    pub fn with_json_key(mut self, key: impl Into<String>) -> Self {
        self.json_key = Some(key.into());
        self
    }

    /// Remote endpoint: requests go to `{base_url}/{create_key_endpoint}`
    pub fn with_remote(mut self, base_url: impl Into<String>, create_key_endpoint: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self.create_key_endpoint = Some(create_key_endpoint.into());
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Remote request timeout, kept at millisecond precision (rounded up)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self.timeout_secs = None;
        self
    }

    /// Write diagnostics to the console at `level` and above
    pub fn with_console_log(mut self, level: LogLevel) -> Self {
        self.console_log = true;
        self.log_level = Some(level);
        self
    }

    /// The attached logger, else a console logger if enabled, else a fresh no-op logger
    pub fn logger(&self) -> SharedLogger {
        match &self.logger {
            Some(logger) => logger.clone(),
            None if self.console_log => Arc::new(
                ConsoleLogger::new().with_min_level(self.log_level.unwrap_or(LogLevel::Info)),
            ),
            None => Arc::new(NoOpLogger::new()),
        }
    }

    /// Effective remote timeout; unset or zero values fall back to the default
    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .or_else(|| self.timeout_secs.map(Duration::from_secs))
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Select the key source these options describe
    ///
    /// Remote URLs are validated here, so a malformed `base_url` fails before
    /// anything is sent.
    pub fn source(&self) -> KeyResult<KeySource> {
        if let Some(api_key) = present(&self.api_key) {
            return Ok(KeySource::Literal(api_key.to_string()));
        }

        if let Some(base_url) = present(&self.base_url) {
            let endpoint = present(&self.create_key_endpoint).ok_or_else(|| {
                KeyError::configuration("create_key_endpoint is required when base_url is set")
            })?;

            let mut strategy = RemoteKeyStrategy::new(base_url, endpoint)?.with_timeout(self.timeout());
            if let Some(username) = &self.username {
                strategy = strategy.with_username(username.as_str());
            }
            if let Some(password) = &self.password {
                strategy = strategy.with_password(password.as_str());
            }
            return Ok(KeySource::Remote(strategy));
        }

        if let Some(location) = self.api_key_location.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            let mut strategy = FileKeyStrategy::new(location);
            if let Some(mode) = self.file_mode {
                strategy = strategy.with_mode(mode);
            }
            if let Some(key) = present(&self.json_key) {
                strategy = strategy.with_json_key(key);
            }
            return Ok(KeySource::File(strategy));
        }

        Err(KeyError::configuration(
            "api_key_location or api_key were not provided and no default location is set",
        ))
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_location", &self.api_key_location)
            .field("file_mode", &self.file_mode)
            .field("json_key", &self.json_key)
            .field("base_url", &self.base_url)
            .field("create_key_endpoint", &self.create_key_endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("timeout_ms", &self.timeout_ms)
            .field("console_log", &self.console_log)
            .field("log_level", &self.log_level)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}
