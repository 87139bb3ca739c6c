//! Key source selection

use std::fmt;

use crate::key::SourceKind;
use crate::strategy::{FileKeyStrategy, RemoteKeyStrategy};

/// Where a resolver obtains its key
///
/// A literal value always wins; the strategies are only consulted when no
/// literal was given.
#[derive(Clone)]
pub enum KeySource {
    Literal(String),
    File(FileKeyStrategy),
    Remote(RemoteKeyStrategy),
}

impl KeySource {
    pub fn kind(&self) -> SourceKind {
        match self {
            KeySource::Literal(_) => SourceKind::Literal,
            KeySource::File(_) => SourceKind::File,
            KeySource::Remote(_) => SourceKind::Remote,
        }
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Literal(_) => f.write_str("Literal(<redacted>)"),
            KeySource::File(strategy) => f.debug_tuple("File").field(strategy).finish(),
            KeySource::Remote(strategy) => f.debug_tuple("Remote").field(strategy).finish(),
        }
    }
}
