//! Subcommand implementations and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod history;
pub mod prompt;
pub mod types;

use std::env;

use tracing::{debug, warn};

use docent_core::{DocentConfig, DocumentType};
use docent_vision::Provider;

use crate::history::{default_database_path, HistoryStore};
use crate::pipeline::FileExtraction;

/// Provider from the command line, falling back to the configured default.
pub fn resolve_provider(arg: Option<&str>, config: &DocentConfig) -> anyhow::Result<Provider> {
    let id = arg.unwrap_or(&config.provider.default_provider);
    Ok(id.parse()?)
}

/// Document type from the command line, falling back to the configured default.
pub fn resolve_document_type(arg: Option<&str>, config: &DocentConfig) -> DocumentType {
    arg.map(DocumentType::from_label)
        .unwrap_or(config.extraction.default_document_type)
}

/// API key from the command line or the provider's environment variable.
pub fn resolve_api_key(arg: Option<String>, provider: Provider) -> anyhow::Result<String> {
    if let Some(key) = arg {
        return Ok(key);
    }
    match env::var(provider.api_key_env()) {
        Ok(key) if !key.trim().is_empty() => {
            debug!("Using API key from {}", provider.api_key_env());
            Ok(key)
        }
        _ => anyhow::bail!(
            "Please enter your API key (pass --api-key or set {})",
            provider.api_key_env()
        ),
    }
}

/// Open the history store unless history is disabled.
///
/// History is optional: a store that cannot be opened is logged and skipped.
pub fn open_history(config: &DocentConfig, disabled: bool) -> Option<HistoryStore> {
    if disabled || !config.history.enabled {
        return None;
    }
    let path = config
        .history
        .database_path
        .clone()
        .unwrap_or_else(default_database_path);
    match HistoryStore::open(&path) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("History disabled for this run: {:#}", e);
            None
        }
    }
}

/// Record `extraction` in `history`, logging instead of failing.
pub fn save_to_history(extraction: &FileExtraction, history: Option<&HistoryStore>) -> Option<i64> {
    match extraction.record_in(history) {
        Ok(Some(id)) => {
            debug!("Saved extraction #{}", id);
            Some(id)
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Could not save {} to history: {:#}", extraction.filename, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use docent_core::extraction::normalize_at;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_provider() {
        let mut config = DocentConfig::default();
        assert_eq!(resolve_provider(None, &config).unwrap(), Provider::OpenAi);
        assert_eq!(
            resolve_provider(Some("gemini"), &config).unwrap(),
            Provider::Gemini
        );

        config.provider.default_provider = "gemini".to_string();
        assert_eq!(resolve_provider(None, &config).unwrap(), Provider::Gemini);
        assert!(resolve_provider(Some("claude"), &config).is_err());
    }

    #[test]
    fn test_resolve_document_type() {
        let config = DocentConfig::default();
        assert_eq!(resolve_document_type(None, &config), DocumentType::AutoDetect);
        assert_eq!(
            resolve_document_type(Some("receipt"), &config),
            DocumentType::Receipt
        );
        assert_eq!(
            resolve_document_type(Some("Bank Statement"), &config),
            DocumentType::GeneralDocument
        );
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let key = resolve_api_key(Some("sk-explicit-key".to_string()), Provider::Gemini).unwrap();
        assert_eq!(key, "sk-explicit-key");
    }

    #[test]
    fn test_disabled_history_is_not_opened() {
        let mut config = DocentConfig::default();
        assert!(open_history(&config, true).is_none());

        config.history.enabled = false;
        assert!(open_history(&config, false).is_none());
    }

    #[test]
    fn test_unopenable_history_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut config = DocentConfig::default();
        config.history.database_path = Some(blocker.join("history.db"));

        assert!(open_history(&config, false).is_none());
    }

    #[test]
    fn test_save_to_history() {
        let at = NaiveDate::from_ymd_opt(2024, 2, 3)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let extraction = FileExtraction {
            filename: "inv.png".to_string(),
            document_type: DocumentType::Invoice,
            provider: "OpenAI".to_string(),
            model: "gpt-4o".to_string(),
            result: normalize_at(Some("Invoice Number: INV-42"), at),
            error: None,
            processing_time_ms: 5,
        };

        assert_eq!(save_to_history(&extraction, None), None);

        let store = HistoryStore::open_in_memory().unwrap();
        let id = save_to_history(&extraction, Some(&store)).unwrap();
        let saved = store.get(id).unwrap().unwrap();
        assert_eq!(saved.extracted_text, "Invoice Number: INV-42");
    }
}
