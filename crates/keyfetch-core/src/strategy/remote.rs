//! Remote key strategy
//!
//! Exchanges a username/password pair for a key with a single POST:
//!
//! ```text
//! POST {base_url}/{endpoint}
//! Content-Type: application/json
//!
//! {"username": "...", "password": "..."}
//! ```
//!
//! The response is JSON, either the key itself or an object with an
//! `api_key` field. There are no retries; the caller decides what to do with
//! a failure.

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde_json::{json, Value};

use super::traits::KeyStrategy;
use crate::error::{KeyError, KeyResult};
use crate::key::{ResolvedKey, SourceKind};
use crate::logging::Logger;
use crate::{log_debug, log_error};

/// Field extracted from an object response
pub const API_KEY_FIELD: &str = "api_key";

/// Request timeout unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a key from a remote credential endpoint
///
/// # Example
///
/// ```no_run
/// use keyfetch_core::{KeyStrategy, NoOpLogger, RemoteKeyStrategy};
///
/// let strategy = RemoteKeyStrategy::new("https://auth.example.com", "get_api_key")?
///     .with_username("andrew")
///     .with_password("hunter2");
/// let key = strategy.fetch(&NoOpLogger::new())?;
/// # Ok::<(), keyfetch_core::KeyError>(())
/// ```
#[derive(Clone)]
pub struct RemoteKeyStrategy {
    base_url: String,
    endpoint: String,
    full_url: Url,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
}

impl RemoteKeyStrategy {
    /// Create a strategy for `{base_url}/{endpoint}`
    ///
    /// Fails with `KeyError::InvalidUrl` if `base_url` is not an absolute
    /// http(s) URL. Nothing is sent over the network here.
    pub fn new(base_url: impl Into<String>, endpoint: impl Into<String>) -> KeyResult<Self> {
        let base_url = base_url.into();
        let endpoint = endpoint.into();

        Self::validate_base_url(&base_url)?;
        let full_url = Self::join(&base_url, &endpoint)?;

        Ok(Self {
            base_url,
            endpoint,
            full_url,
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Check that `base_url` is a well-formed absolute http(s) URL with a host
    pub fn validate_base_url(base_url: &str) -> KeyResult<Url> {
        let url = Url::parse(base_url).map_err(|e| KeyError::invalid_url(base_url, e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(KeyError::invalid_url(
                base_url,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if !url.has_host() {
            return Err(KeyError::invalid_url(base_url, "missing host"));
        }

        Ok(url)
    }

    fn join(base_url: &str, endpoint: &str) -> KeyResult<Url> {
        let joined = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| KeyError::invalid_url(joined.clone(), e.to_string()))
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The URL the request is sent to
    pub fn full_url(&self) -> &str {
        self.full_url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the request body, failing before any I/O if credentials are missing
    fn request_body(&self, logger: &dyn Logger) -> KeyResult<Value> {
        let username = self.username.as_deref().filter(|u| !u.is_empty());
        let password = self.password.as_deref().filter(|p| !p.is_empty());

        match (username, password) {
            (Some(username), Some(password)) => Ok(json!({
                "username": username,
                "password": password,
            })),
            _ => {
                let err = KeyError::MissingCredentials;
                log_error!(logger, "{} (endpoint {})", err, self.full_url);
                Err(err)
            }
        }
    }

    fn connection_error(&self, source: reqwest::Error, logger: &dyn Logger) -> KeyError {
        let err = KeyError::RemoteConnection {
            url: self.full_url.to_string(),
            source,
        };
        log_error!(logger, "{}", err);
        err
    }

    fn client_error(&self, reason: impl fmt::Display, logger: &dyn Logger) -> KeyError {
        let err = KeyError::configuration(format!(
            "Failed to build HTTP client for {}: {}",
            self.full_url, reason
        ));
        log_error!(logger, "{}", err);
        err
    }

    /// Turn a status and body into a key
    fn interpret(&self, status: u16, success: bool, body: String, logger: &dyn Logger) -> KeyResult<ResolvedKey> {
        if !success {
            let err = KeyError::remote_request(self.full_url.as_str(), status, body);
            log_error!(logger, "{}", err);
            return Err(err);
        }

        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            let err = KeyError::invalid_response(self.full_url.as_str(), format!("body is not JSON: {}", e));
            log_error!(logger, "{}", err);
            err
        })?;

        let value = match parsed {
            Value::Object(mut map) => match map.remove(API_KEY_FIELD) {
                Some(key) => key,
                None => Value::Object(map),
            },
            other => other,
        };

        Ok(ResolvedKey::from_json(value))
    }

    /// Same exchange as `fetch`, without blocking the caller's runtime
    pub async fn fetch_async(&self, logger: &dyn Logger) -> KeyResult<ResolvedKey> {
        let body = self.request_body(logger)?;
        log_debug!(logger, "Requesting key from {}", self.full_url);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.client_error(e, logger))?;

        let response = client
            .post(self.full_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.connection_error(e, logger))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.connection_error(e, logger))?;

        self.interpret(status.as_u16(), status.is_success(), text, logger)
    }
}

impl KeyStrategy for RemoteKeyStrategy {
    fn name(&self) -> &str {
        "RemoteKeyStrategy"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }

    fn fetch(&self, logger: &dyn Logger) -> KeyResult<ResolvedKey> {
        let body = self.request_body(logger)?;
        log_debug!(logger, "Requesting key from {}", self.full_url);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.client_error(e, logger))?;

        let response = client
            .post(self.full_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .map_err(|e| self.connection_error(e, logger))?;

        let status = response.status();
        let text = response.text().map_err(|e| self.connection_error(e, logger))?;

        self.interpret(status.as_u16(), status.is_success(), text, logger)
    }
}

impl fmt::Debug for RemoteKeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteKeyStrategy")
            .field("full_url", &self.full_url.as_str())
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use mockito::{Matcher, Server, ServerGuard};

    fn strategy_for(server: &ServerGuard) -> RemoteKeyStrategy {
        RemoteKeyStrategy::new(server.url(), "get_api_key")
            .unwrap()
            .with_username("andrew")
            .with_password("s3cret")
    }

    #[test]
    fn test_rejects_malformed_base_url() {
        let err = RemoteKeyStrategy::new("not a url", "get_api_key").unwrap_err();
        assert!(matches!(err, KeyError::InvalidUrl { ref url, .. } if url == "not a url"));

        assert!(matches!(
            RemoteKeyStrategy::new("ftp://files.example.com", "key"),
            Err(KeyError::InvalidUrl { .. })
        ));
        assert!(matches!(
            RemoteKeyStrategy::new("", "key"),
            Err(KeyError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_full_url_join() {
        let strategy = RemoteKeyStrategy::new("http://127.0.0.1:5000", "get_api_key").unwrap();
        assert_eq!(strategy.full_url(), "http://127.0.0.1:5000/get_api_key");

        let strategy = RemoteKeyStrategy::new("https://auth.example.com/v1/", "/keys/create").unwrap();
        assert_eq!(strategy.full_url(), "https://auth.example.com/v1/keys/create");
        assert_eq!(strategy.base_url(), "https://auth.example.com/v1/");
        assert_eq!(strategy.endpoint(), "/keys/create");
    }

    #[test]
    fn test_missing_credentials_before_network() {
        // Port 9 (discard) is never contacted: the check happens first.
        let strategy = RemoteKeyStrategy::new("http://127.0.0.1:9", "get_api_key")
            .unwrap()
            .with_username("andrew");
        let logger = MemoryLogger::new();

        let err = strategy.fetch(&logger).unwrap_err();
        assert!(matches!(err, KeyError::MissingCredentials));
        assert!(logger.contains(LogLevel::Error, "Username and password are required"));

        let strategy = strategy.with_password("");
        assert!(matches!(strategy.fetch(&NoOpLogger::new()), Err(KeyError::MissingCredentials)));
    }

    #[test]
    fn test_extracts_api_key_field() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/get_api_key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"username": "andrew", "password": "s3cret"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"api_key": "xyz"}"#)
            .create();

        let key = strategy_for(&server).fetch(&NoOpLogger::new()).unwrap();
        assert_eq!(key.as_str(), Some("xyz"));
        mock.assert();
    }

    #[test]
    fn test_raw_body_without_api_key_field() {
        let mut server = Server::new();
        server
            .mock("POST", "/get_api_key")
            .with_status(201)
            .with_body(r#"{"token": "xyz", "expires_in": 3600}"#)
            .create();

        let key = strategy_for(&server).fetch(&NoOpLogger::new()).unwrap();
        assert_eq!(key, ResolvedKey::Json(json!({"token": "xyz", "expires_in": 3600})));
    }

    #[test]
    fn test_bare_string_body() {
        let mut server = Server::new();
        server
            .mock("POST", "/get_api_key")
            .with_status(200)
            .with_body(r#""plain-key""#)
            .create();

        let key = strategy_for(&server).fetch(&NoOpLogger::new()).unwrap();
        assert_eq!(key.as_str(), Some("plain-key"));
    }

    #[test]
    fn test_unauthorized_carries_body() {
        let mut server = Server::new();
        server
            .mock("POST", "/get_api_key")
            .with_status(401)
            .with_body("invalid username or password")
            .create();
        let logger = MemoryLogger::new();

        let err = strategy_for(&server).fetch(&logger).unwrap_err();
        match err {
            KeyError::RemoteKeyRequest { status, ref body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid username or password");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(logger.contains(LogLevel::Error, "401"));
    }

    #[test]
    fn test_non_json_success_body() {
        let mut server = Server::new();
        server
            .mock("POST", "/get_api_key")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create();

        let err = strategy_for(&server).fetch(&NoOpLogger::new()).unwrap_err();
        assert!(matches!(err, KeyError::InvalidResponse { .. }));
    }

    #[test]
    fn test_connection_refused() {
        // Bind then drop a listener to get a port with nothing behind it.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let strategy = RemoteKeyStrategy::new(format!("http://127.0.0.1:{}", port), "get_api_key")
            .unwrap()
            .with_username("andrew")
            .with_password("s3cret")
            .with_timeout(Duration::from_secs(2));
        let logger = MemoryLogger::new();

        let err = strategy.fetch(&logger).unwrap_err();
        assert!(matches!(err, KeyError::RemoteConnection { .. }));
        assert!(logger.contains(LogLevel::Error, "Failed to connect"));
    }

    #[test]
    fn test_client_build_failure_is_logged() {
        let strategy = RemoteKeyStrategy::new("http://127.0.0.1:5000", "get_api_key").unwrap();
        let logger = MemoryLogger::new();

        let err = strategy.client_error("no TLS backend", &logger);
        assert!(matches!(err, KeyError::Configuration(ref msg) if msg.contains("no TLS backend")));
        assert!(logger.contains(LogLevel::Error, "Failed to build HTTP client for http://127.0.0.1:5000/get_api_key"));
    }

    #[test]
    fn test_debug_hides_password() {
        let strategy = RemoteKeyStrategy::new("http://127.0.0.1:5000", "get_api_key")
            .unwrap()
            .with_username("andrew")
            .with_password("s3cret");
        let printed = format!("{:?}", strategy);
        assert!(printed.contains("andrew"));
        assert!(!printed.contains("s3cret"));
    }

    #[tokio::test]
    async fn test_fetch_async() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/get_api_key")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"api_key": "async-xyz"}"#)
            .create_async()
            .await;

        let key = strategy_for(&server).fetch_async(&NoOpLogger::new()).await.unwrap();
        assert_eq!(key.as_str(), Some("async-xyz"));
        mock.assert_async().await;
    }
}
