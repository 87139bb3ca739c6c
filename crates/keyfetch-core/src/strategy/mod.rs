//! Key acquisition strategies
//!
//! - `FileKeyStrategy`: reads a local text or JSON file
//! - `RemoteKeyStrategy`: exchanges username/password for a key over HTTP

mod traits;
mod file;
mod remote;

pub use traits::KeyStrategy;
pub use file::{FileKeyStrategy, FileMode};
pub use remote::{RemoteKeyStrategy, API_KEY_FIELD, DEFAULT_TIMEOUT};
