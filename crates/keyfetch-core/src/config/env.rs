//! Environment variable overrides

use std::path::PathBuf;

use super::options::ResolverConfig;
use crate::error::{KeyError, KeyResult};
use crate::logging::LogLevel;
use crate::strategy::FileMode;

/// Prefix shared by every recognized variable
pub const ENV_PREFIX: &str = "KEYFETCH_";

impl ResolverConfig {
    /// Overlay `KEYFETCH_*` environment variables onto these options
    ///
    /// Recognized: `KEYFETCH_API_KEY`, `KEYFETCH_API_KEY_LOCATION`,
    /// `KEYFETCH_FILE_MODE`, `KEYFETCH_JSON_KEY`, `KEYFETCH_BASE_URL`,
    /// `KEYFETCH_CREATE_KEY_ENDPOINT`, `KEYFETCH_USERNAME`,
    /// `KEYFETCH_PASSWORD`, `KEYFETCH_TIMEOUT_MS`, `KEYFETCH_LOG_LEVEL`
    /// (which also turns on console logging). Unset or empty variables leave
    /// the option alone.
    pub fn with_env_overrides(self) -> KeyResult<Self> {
        self.with_overrides_from(process_env)
    }

    /// Overlay values from an arbitrary lookup keyed by variable name
    pub fn with_overrides_from<F>(mut self, lookup: F) -> KeyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{}{}", ENV_PREFIX, suffix)).filter(|v| !v.is_empty());

        if let Some(value) = var("API_KEY") {
            self.api_key = Some(value);
        }
        if let Some(value) = var("API_KEY_LOCATION") {
            self.api_key_location = Some(PathBuf::from(value));
        }
        if let Some(value) = var("FILE_MODE") {
            self.file_mode = Some(value.parse::<FileMode>()?);
        }
        if let Some(value) = var("JSON_KEY") {
            self.json_key = Some(value);
        }
        if let Some(value) = var("BASE_URL") {
            self.base_url = Some(value);
        }
        if let Some(value) = var("CREATE_KEY_ENDPOINT") {
            self.create_key_endpoint = Some(value);
        }
        if let Some(value) = var("USERNAME") {
            self.username = Some(value);
        }
        if let Some(value) = var("PASSWORD") {
            self.password = Some(value);
        }
        if let Some(value) = var("TIMEOUT_MS") {
            let millis = value.trim().parse::<u64>().map_err(|e| {
                KeyError::configuration(format!("Invalid {}TIMEOUT_MS '{}': {}", ENV_PREFIX, value, e))
            })?;
            self.timeout_ms = Some(millis);
        }
        if let Some(value) = var("LOG_LEVEL") {
            let level = value.parse::<LogLevel>().map_err(KeyError::configuration)?;
            self.console_log = true;
            self.log_level = Some(level);
        }

        Ok(self)
    }
}

/// Read a variable from the process environment, non-UTF-8 values count as unset
fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
