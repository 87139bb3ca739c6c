//! Loading options from YAML or JSON files
//!
//! Supports an explicit path and the user-level file
//! (~/.config/keyfetch/config.yaml).

use std::fs;
use std::path::{Path, PathBuf};

use super::options::ResolverConfig;
use crate::error::{KeyError, KeyResult};

/// Location of the user-level config file
pub fn user_config_path() -> PathBuf {
    // XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
    config_dir.join("keyfetch").join("config.yaml")
}

impl ResolverConfig {
    /// Load options from a file
    ///
    /// `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> KeyResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            KeyError::configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&content).map_err(|e| {
                KeyError::configuration(format!("Failed to parse JSON config {}: {}", path.display(), e))
            })
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                KeyError::configuration(format!("Failed to parse YAML config {}: {}", path.display(), e))
            })
        }
    }

    /// Load the user-level config, `None` if it does not exist
    pub fn from_user_config() -> KeyResult<Option<Self>> {
        let path = user_config_path();
        if !path.exists() {
            return Ok(None);
        }
        Self::from_file(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::strategy::FileMode;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "api_key_location: /etc/myapp/creds.json\nfile_mode: json\njson_key: api_key\ntimeout_secs: 10\n",
        )
        .unwrap();

        let config = ResolverConfig::from_file(&path).unwrap();
        assert_eq!(config.api_key_location, Some(PathBuf::from("/etc/myapp/creds.json")));
        assert_eq!(config.file_mode, Some(FileMode::Json));
        assert_eq!(config.json_key.as_deref(), Some("api_key"));
        assert_eq!(config.timeout().as_secs(), 10);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_json_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"base_url": "http://127.0.0.1:5000", "create_key_endpoint": "get_api_key", "username": "andrew", "file_mode": "txt"}"#,
        )
        .unwrap();

        let config = ResolverConfig::from_file(&path).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:5000"));
        assert_eq!(config.username.as_deref(), Some("andrew"));
        assert_eq!(config.file_mode, Some(FileMode::Text));
    }

    #[test]
    fn test_yaml_logging_and_millis() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "console_log: true\nlog_level: debug\ntimeout_ms: 500\n").unwrap();

        let config = ResolverConfig::from_file(&path).unwrap();
        assert!(config.console_log);
        assert_eq!(config.log_level, Some(LogLevel::Debug));
        assert_eq!(config.timeout(), std::time::Duration::from_millis(500));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "file_mode: xml\n").unwrap();

        assert!(matches!(ResolverConfig::from_file(&path), Err(KeyError::Configuration(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempdir().unwrap();
        let err = ResolverConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_user_config_path() {
        let path = user_config_path();
        assert!(path.ends_with("keyfetch/config.yaml"));
    }
}
