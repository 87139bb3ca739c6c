//! Key resolution error types

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while resolving an API key
#[derive(Error, Debug)]
pub enum KeyError {
    /// Neither a literal key nor enough source information was configured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The key file does not exist or is not a regular file
    #[error("Key file not found: {}", path.display())]
    KeyFileNotFound { path: PathBuf },

    /// Reading the key file failed
    #[error("Failed to read key file {}: {source}", path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key file is not valid JSON
    #[error("Key file {} is not valid JSON: {source}", path.display())]
    MalformedKeyFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configured JSON sub-key is not present in the document
    #[error("Key '{key}' not found in {}", path.display())]
    KeyExtraction { path: PathBuf, key: String },

    /// The base URL of a remote endpoint is malformed
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Username or password missing for a remote fetch
    #[error("Username and password are required to fetch a remote key")]
    MissingCredentials,

    /// The remote endpoint could not be reached
    #[error("Failed to connect to {url}: {source}")]
    RemoteConnection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote endpoint answered with a non-success status
    #[error("Key request to {url} failed ({status}): {body}")]
    RemoteKeyRequest { url: String, status: u16, body: String },

    /// The remote endpoint answered with a body that is not JSON
    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

impl KeyError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a key-file-not-found error
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::KeyFileNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a key extraction error
    pub fn extraction(path: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self::KeyExtraction {
            path: path.as_ref().to_path_buf(),
            key: key.into(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a remote request error
    pub fn remote_request(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::RemoteKeyRequest {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Response body of a failed remote request, if this is one
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::RemoteKeyRequest { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type KeyResult<T> = Result<T, KeyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = KeyError::file_not_found("/etc/app/key.txt");
        assert_eq!(err.to_string(), "Key file not found: /etc/app/key.txt");

        let err = KeyError::extraction("creds.json", "token");
        assert_eq!(err.to_string(), "Key 'token' not found in creds.json");

        let err = KeyError::remote_request("http://auth.local/get_api_key", 401, "bad credentials");
        assert!(err.to_string().contains("401"));
        assert_eq!(err.response_body(), Some("bad credentials"));
    }

    #[test]
    fn test_response_body_only_for_requests() {
        assert!(KeyError::MissingCredentials.response_body().is_none());
        assert!(KeyError::configuration("x").response_body().is_none());
    }
}
