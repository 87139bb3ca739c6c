//! File-backed key strategy

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use super::traits::KeyStrategy;
use crate::error::{KeyError, KeyResult};
use crate::key::{ResolvedKey, SourceKind};
use crate::logging::Logger;
use crate::{log_debug, log_error, log_warn};

/// How a key file is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    /// Whole file, surrounding whitespace trimmed
    #[default]
    #[serde(alias = "txt")]
    Text,
    /// JSON document, optionally narrowed to one top-level key
    Json,
}

impl FileMode {
    /// Infer the mode from a file extension (`.json`, `.txt`)
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(FileMode::Json),
            "txt" => Some(FileMode::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileMode::Text => "text",
            FileMode::Json => "json",
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileMode {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(FileMode::Text),
            "json" => Ok(FileMode::Json),
            other => Err(KeyError::configuration(format!(
                "Unknown file mode '{}', expected 'text' or 'json'",
                other
            ))),
        }
    }
}

/// Reads a key from a local file
///
/// # Example
///
/// ```no_run
/// use keyfetch_core::{FileKeyStrategy, FileMode, KeyStrategy, NoOpLogger};
///
/// let strategy = FileKeyStrategy::new("secrets/service.json")
///     .with_mode(FileMode::Json)
///     .with_json_key("api_key");
/// let key = strategy.fetch(&NoOpLogger::new()).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileKeyStrategy {
    location: Option<PathBuf>,
    default_location: Option<PathBuf>,
    mode: Option<FileMode>,
    json_key: Option<String>,
}

impl FileKeyStrategy {
    /// Read from an explicit location
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    /// Read from `default_location` unless a location is set later
    pub fn at_default(default_location: impl Into<PathBuf>) -> Self {
        Self {
            default_location: Some(default_location.into()),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Force a mode instead of inferring it from the extension
    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// In JSON mode, return only the value under this top-level key
    pub fn with_json_key(mut self, key: impl Into<String>) -> Self {
        self.json_key = Some(key.into());
        self
    }

    /// The path that will be read: the explicit location, else the default
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref().or_else(|| self.default_location())
    }

    pub fn json_key(&self) -> Option<&str> {
        self.json_key.as_deref()
    }

    /// Work out the effective mode for `path`
    ///
    /// An explicit mode wins. Without one the extension decides, falling back
    /// to text. Disagreements are logged as warnings and never fail.
    pub fn resolve_mode(&self, path: &Path, logger: &dyn Logger) -> FileMode {
        let inferred = FileMode::from_extension(path);
        match (self.mode, inferred) {
            (Some(declared), Some(inferred)) if declared != inferred => {
                log_warn!(
                    logger,
                    "File mode '{}' does not match extension of {} (looks like '{}'), reading as '{}'",
                    declared,
                    path.display(),
                    inferred,
                    declared
                );
                declared
            }
            (Some(declared), _) => declared,
            (None, Some(inferred)) => inferred,
            (None, None) => {
                log_warn!(
                    logger,
                    "Unrecognized extension on {}, reading as text",
                    path.display()
                );
                FileMode::Text
            }
        }
    }

    fn read_contents(&self, path: &Path, logger: &dyn Logger) -> KeyResult<String> {
        if !path.is_file() {
            let err = KeyError::file_not_found(path);
            log_error!(logger, "{}", err);
            return Err(err);
        }

        fs::read_to_string(path).map_err(|source| {
            let err = KeyError::KeyRead {
                path: path.to_path_buf(),
                source,
            };
            log_error!(logger, "{}", err);
            err
        })
    }

    fn extract_json(&self, path: &Path, contents: &str, logger: &dyn Logger) -> KeyResult<ResolvedKey> {
        let document: Value = serde_json::from_str(contents).map_err(|source| {
            let err = KeyError::MalformedKeyFile {
                path: path.to_path_buf(),
                source,
            };
            log_error!(logger, "{}", err);
            err
        })?;

        let Some(key) = self.json_key.as_deref() else {
            return Ok(ResolvedKey::from_json(document));
        };

        match document {
            Value::Object(mut map) => map.remove(key).map(ResolvedKey::from_json).ok_or_else(|| {
                let err = KeyError::extraction(path, key);
                log_error!(logger, "{}", err);
                err
            }),
            _ => {
                let err = KeyError::extraction(path, key);
                log_error!(logger, "{} (document is not an object)", err);
                Err(err)
            }
        }
    }
}

impl KeyStrategy for FileKeyStrategy {
    fn name(&self) -> &str {
        "FileKeyStrategy"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn default_location(&self) -> Option<&Path> {
        self.default_location.as_deref()
    }

    fn fetch(&self, logger: &dyn Logger) -> KeyResult<ResolvedKey> {
        let path = self.location().ok_or_else(|| {
            let err = KeyError::configuration(
                "api_key_location or api_key must be provided, and no default location is set",
            );
            log_error!(logger, "{}", err);
            err
        })?;

        let mode = self.resolve_mode(path, logger);
        log_debug!(logger, "Reading key from {} as {}", path.display(), mode);

        let contents = self.read_contents(path, logger)?;
        match mode {
            FileMode::Text => {
                if let Some(key) = &self.json_key {
                    log_warn!(logger, "Ignoring json_key '{}' for text file {}", key, path.display());
                }
                Ok(ResolvedKey::Text(contents.trim().to_string()))
            }
            FileMode::Json => self.extract_json(path, &contents, logger),
        }
    }
}
