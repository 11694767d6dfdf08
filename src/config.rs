//! Configuration handling for the engine

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::state::MessageTable;

/// Quiescence window for the debounced email message, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Tunable engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Debounce window for the email message recomputation
    pub debounce_ms: u64,
    /// Error-kind to message-text table, in projection order
    pub messages: MessageTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            messages: MessageTable::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist
    pub fn load(path: &Path) -> Result<Self, FormError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: EngineConfig = serde_json::from_str(&content)?;
            return Ok(config);
        }
        Ok(Self::default())
    }

    /// Save configuration to a JSON file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), FormError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.debounce_ms, 1000);
        assert!(config.messages.text_for(ErrorKind::Required).is_some());
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = EngineConfig {
            debounce_ms: 250,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let parsed: EngineConfig = serde_json::from_str(r#"{"debounce_ms": 50}"#).unwrap();
        assert_eq!(parsed.debounce_ms, 50);
        assert_eq!(parsed.messages, MessageTable::default());
    }

    #[test]
    fn test_load_returns_default_when_no_file() {
        let config = EngineConfig::load(Path::new("/nonexistent/signup-engine/config.json"));
        assert_eq!(config.unwrap(), EngineConfig::default());
    }
}
