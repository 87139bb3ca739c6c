//! Strategy trait shared by every key source

use std::path::Path;

use crate::error::KeyResult;
use crate::key::{ResolvedKey, SourceKind};
use crate::logging::Logger;

/// A way of fetching a key when no literal value was supplied
///
/// Implementations log their own failures through the logger they are
/// handed before returning the error.
///
/// A strategy type can carry a default location, used when the caller did
/// not configure one:
///
/// ```
/// use std::path::Path;
/// use keyfetch_core::{KeyResult, KeyStrategy, Logger, ResolvedKey, SourceKind};
/// use keyfetch_core::strategy::FileKeyStrategy;
///
/// struct BillingKey;
///
/// impl KeyStrategy for BillingKey {
///     fn name(&self) -> &str { "BillingKey" }
///     fn kind(&self) -> SourceKind { SourceKind::File }
///     fn default_location(&self) -> Option<&Path> { Some(Path::new("/etc/billing/api_key.txt")) }
///     fn fetch(&self, logger: &dyn Logger) -> KeyResult<ResolvedKey> {
///         FileKeyStrategy::at_default("/etc/billing/api_key.txt").fetch(logger)
///     }
/// }
/// ```
pub trait KeyStrategy: Send + Sync {
    /// Human-readable name, used in log messages
    fn name(&self) -> &str;

    /// Which kind of source this strategy reads
    fn kind(&self) -> SourceKind;

    /// Location used when none was configured explicitly
    fn default_location(&self) -> Option<&Path> {
        None
    }

    /// Fetch the key
    fn fetch(&self, logger: &dyn Logger) -> KeyResult<ResolvedKey>;
}
