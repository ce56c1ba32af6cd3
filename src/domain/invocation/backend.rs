//! Backend identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a model backend.
///
/// The core passes it through to the invocation adapter and never branches
/// on its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendId(String);

impl BackendId {
    /// Create a new backend ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the identifier is blank
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for BackendId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BackendId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BackendId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_id_serialization() {
        let id = BackendId::new("model-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"model-1\"");

        let parsed: BackendId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_blank_backend_id() {
        assert!(BackendId::new("").is_blank());
        assert!(BackendId::new("   ").is_blank());
        assert!(!BackendId::from("anthropic.claude-v2:1").is_blank());
    }
}
