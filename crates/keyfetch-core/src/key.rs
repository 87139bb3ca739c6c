//! Resolved key value

use std::fmt;

use serde_json::Value;

/// The secret made available to the caller
///
/// Text sources (literal keys, text files, string JSON values) produce
/// `Text`. Anything else pulled out of a JSON document is kept as parsed.
#[derive(Clone, PartialEq)]
pub enum ResolvedKey {
    Text(String),
    Json(Value),
}

impl ResolvedKey {
    /// Wrap a parsed JSON value, unwrapping plain strings to `Text`
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Json(other),
        }
    }

    /// The key as a string slice, if it is textual
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// The key as a JSON document, if it is not textual
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Text(_) => None,
            Self::Json(value) => Some(value),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Render the key for use in a request header or similar
    ///
    /// Text is returned unchanged; documents are serialized compactly.
    pub fn expose(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Json(value) => value.to_string(),
        }
    }
}

// Never print the secret itself.
impl fmt::Debug for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(_) => f.write_str("ResolvedKey::Text(<redacted>)"),
            Self::Json(_) => f.write_str("ResolvedKey::Json(<redacted>)"),
        }
    }
}

impl From<String> for ResolvedKey {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ResolvedKey {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Which kind of source produced a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Literal,
    File,
    Remote,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Literal => "literal",
            SourceKind::File => "file",
            SourceKind::Remote => "remote",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_unwraps_strings() {
        assert_eq!(ResolvedKey::from_json(json!("abc")), ResolvedKey::Text("abc".into()));

        let doc = ResolvedKey::from_json(json!({"token": "abc", "ttl": 30}));
        assert!(!doc.is_text());
        assert_eq!(doc.as_json().and_then(|v| v.get("ttl")), Some(&json!(30)));
        assert_eq!(doc.as_str(), None);
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = ResolvedKey::from("sk-live-123");
        let printed = format!("{:?}", key);
        assert!(!printed.contains("sk-live-123"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn test_expose() {
        assert_eq!(ResolvedKey::from("abc").expose(), "abc");
        assert_eq!(ResolvedKey::Json(json!(12345)).expose(), "12345");
    }
}
