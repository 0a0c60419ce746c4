//! Configuration structures for docent.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::document::DocumentType;
use crate::error::ConfigError;

/// Main configuration for docent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocentConfig {
    /// AI provider configuration.
    pub provider: ProviderConfig,

    /// Extraction configuration.
    pub extraction: ExtractionConfig,

    /// History store configuration.
    pub history: HistoryConfig,
}

/// AI provider configuration.
///
/// API keys are never stored here; they come from the environment or the
/// command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider used when none is given ("openai" or "gemini").
    pub default_provider: String,

    /// OpenAI model used when none is given.
    pub openai_model: String,

    /// Gemini model used when none is given.
    pub gemini_model: String,

    /// OpenAI-compatible API base URL.
    pub openai_base_url: String,

    /// Gemini API base URL.
    pub gemini_base_url: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_provider: "openai".to_string(),
            openai_model: "gpt-4o".to_string(),
            gemini_model: "gemini-1.5-pro".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
        }
    }
}

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Document type used when none is given.
    pub default_document_type: DocumentType,

    /// JPEG quality (1-100) for the re-encoded image sent to the provider.
    pub jpeg_quality: u8,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_document_type: DocumentType::AutoDetect,
            jpeg_quality: 75,
        }
    }
}

/// History store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Record successful extractions.
    pub enabled: bool,

    /// SQLite database path (defaults to the user data directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: None,
        }
    }
}

impl DocentConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DocentConfig::default();
        config.provider.default_provider = "gemini".to_string();
        config.extraction.default_document_type = DocumentType::Receipt;
        config.save(&path).unwrap();

        let loaded = DocentConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "provider": { "openai_model": "gpt-4o-mini" } }"#).unwrap();

        let loaded = DocentConfig::from_file(&path).unwrap();
        assert_eq!(loaded.provider.openai_model, "gpt-4o-mini");
        assert_eq!(loaded.provider.gemini_model, "gemini-1.5-pro");
        assert_eq!(loaded.extraction.jpeg_quality, 75);
        assert!(loaded.history.enabled);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = DocentConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
