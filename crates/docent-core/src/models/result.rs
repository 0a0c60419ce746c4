//! Extraction result models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of normalizing a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStatus {
    /// The provider returned non-empty text.
    #[serde(rename = "Success")]
    Success,
    /// The provider returned nothing usable.
    #[serde(rename = "No data")]
    NoData,
}

impl ExtractionStatus {
    /// Status label.
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionStatus::Success => "Success",
            ExtractionStatus::NoData => "No data",
        }
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts derived from non-empty extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCounts {
    /// Length in Unicode code points.
    pub character_count: usize,

    /// Number of whitespace-delimited tokens.
    pub word_count: usize,

    /// Number of newline-delimited segments (at least 1).
    pub line_count: usize,

    /// When the text was normalized (ISO-8601, local time).
    pub timestamp: String,
}

/// Summary statistics for an extraction.
///
/// Serializes as `{"status": "No data"}` when there is nothing to count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Extraction status.
    pub status: ExtractionStatus,

    /// Counts, present only for `Success`.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub counts: Option<TextCounts>,
}

impl SummaryStats {
    /// Stats for an empty or missing response.
    pub fn no_data() -> Self {
        Self {
            status: ExtractionStatus::NoData,
            counts: None,
        }
    }

    pub fn character_count(&self) -> Option<usize> {
        self.counts.as_ref().map(|c| c.character_count)
    }

    pub fn word_count(&self) -> Option<usize> {
        self.counts.as_ref().map(|c| c.word_count)
    }

    pub fn line_count(&self) -> Option<usize> {
        self.counts.as_ref().map(|c| c.line_count)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.counts.as_ref().map(|c| c.timestamp.as_str())
    }
}

/// Normalized representation of a provider's raw text response.
///
/// Built once by [`crate::extraction::normalize`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    raw_text: String,
    formatted: String,
    stats: SummaryStats,
}

impl ExtractionResult {
    pub(crate) fn new(raw_text: String, formatted: String, stats: SummaryStats) -> Self {
        Self {
            raw_text,
            formatted,
            stats,
        }
    }

    /// Raw provider text, byte-identical to what was normalized. Empty for "No data".
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Display string with timestamp header and separator rules.
    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    /// Summary statistics.
    pub fn stats(&self) -> &SummaryStats {
        &self.stats
    }

    /// Extraction status.
    pub fn status(&self) -> ExtractionStatus {
        self.stats.status
    }

    /// Whether the provider produced usable text.
    pub fn is_success(&self) -> bool {
        self.stats.status == ExtractionStatus::Success
    }
}
