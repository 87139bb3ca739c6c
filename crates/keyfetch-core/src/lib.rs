//! keyfetch core
//!
//! API key acquisition for applications that need a key before making
//! authenticated calls elsewhere. A key comes from exactly one source:
//!
//! - a literal value supplied by the caller
//! - a local file, read as trimmed text or as a JSON document
//! - a remote endpoint that exchanges username/password for a key
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use keyfetch_core::{ConsoleLogger, KeyResolver, ResolverConfig};
//!
//! let config = ResolverConfig::new()
//!     .with_logger(Arc::new(ConsoleLogger::new()))
//!     .with_remote("https://auth.example.com", "get_api_key")
//!     .with_credentials("andrew", "hunter2");
//!
//! let key = KeyResolver::get_api_key(&config)?;
//! # Ok::<(), keyfetch_core::KeyError>(())
//! ```

pub mod logging;
pub mod error;
pub mod key;
pub mod source;
pub mod strategy;
pub mod config;
pub mod resolver;

pub use error::{KeyError, KeyResult};
pub use key::{ResolvedKey, SourceKind};
pub use source::KeySource;
pub use strategy::{KeyStrategy, FileKeyStrategy, FileMode, RemoteKeyStrategy};
pub use config::ResolverConfig;
pub use resolver::KeyResolver;

pub use logging::{Logger, LogLevel, SharedLogger, NoOpLogger, ConsoleLogger, MemoryLogger};
