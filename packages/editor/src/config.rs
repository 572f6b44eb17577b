//! Editor configuration

use crate::errors::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Seeds node key generation
    pub namespace: String,

    /// Initial editable state; `false` starts the editor read-only
    pub editable: bool,

    /// Drop nodes no longer reachable from the root on every commit
    pub collect_garbage: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            namespace: "folio".to_string(),
            editable: true,
            collect_garbage: true,
        }
    }
}

impl EditorConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> EditorResult<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EditorResult<()> {
        if self.namespace.trim().is_empty() {
            return Err(EditorError::Config("namespace must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = EditorConfig::from_json_str(r#"{"namespace": "notes"}"#).unwrap();

        assert_eq!(config.namespace, "notes");
        assert!(config.editable);
        assert!(config.collect_garbage);
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let result = EditorConfig::from_json_str(r#"{"namespace": "  "}"#);
        assert!(matches!(result, Err(EditorError::Config(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = EditorConfig::from_json_str("{");
        assert!(matches!(result, Err(EditorError::Json(_))));
    }
}
