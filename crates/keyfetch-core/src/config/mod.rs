//! Resolver configuration
//!
//! `ResolverConfig` carries every recognized option. It can be built in code,
//! loaded from a YAML/JSON file, and overlaid with `KEYFETCH_*` environment
//! variables.

mod options;
mod file;
mod env;

pub use options::ResolverConfig;
pub use file::user_config_path;
pub use env::ENV_PREFIX;
