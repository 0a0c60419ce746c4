//! Record shape handed to the history store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::document::DocumentType;
use super::result::ExtractionResult;
use crate::extraction::format_iso_timestamp;

/// One persisted extraction.
///
/// The core only assembles the record; writing it is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Row identifier, assigned by the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Resolved document type label (e.g. "Invoice").
    pub document_type: String,

    /// Original file name of the uploaded document.
    pub filename: String,

    /// Raw provider text, unmodified.
    pub extracted_text: String,

    /// Provider display name (e.g. "OpenAI").
    pub provider: String,

    /// Model used for the extraction.
    pub model: String,

    /// Creation time, ISO-8601 local time.
    pub created_at: String,
}

impl ExtractionRecord {
    /// Build a record from a normalized result.
    ///
    /// `created_at` reuses the normalization timestamp when there is one.
    pub fn from_result(
        document_type: DocumentType,
        filename: impl Into<String>,
        result: &ExtractionResult,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let created_at = result
            .stats()
            .timestamp()
            .map(str::to_string)
            .unwrap_or_else(|| format_iso_timestamp(chrono::Local::now().naive_local()));

        Self::with_created_at(document_type, filename, result, provider, model, created_at)
    }

    /// Build a record with an explicit creation time.
    pub fn at(
        document_type: DocumentType,
        filename: impl Into<String>,
        result: &ExtractionResult,
        provider: impl Into<String>,
        model: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self::with_created_at(
            document_type,
            filename,
            result,
            provider,
            model,
            format_iso_timestamp(created_at),
        )
    }

    fn with_created_at(
        document_type: DocumentType,
        filename: impl Into<String>,
        result: &ExtractionResult,
        provider: impl Into<String>,
        model: impl Into<String>,
        created_at: String,
    ) -> Self {
        Self {
            id: None,
            document_type: document_type.resolve().label().to_string(),
            filename: filename.into(),
            extracted_text: result.raw_text().to_string(),
            provider: provider.into(),
            model: model.into(),
            created_at,
        }
    }
}
