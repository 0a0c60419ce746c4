//! Normalization of raw provider text into an [`ExtractionResult`].

use chrono::{Local, NaiveDateTime};

use crate::models::{ExtractionResult, ExtractionStatus, SummaryStats, TextCounts};

/// Width of the separator rules around the extracted text.
pub const RULE_WIDTH: usize = 50;

/// Display string used when the provider returned nothing.
pub const NO_DATA_DISPLAY: &str = "No data extracted";

const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const HEADER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize provider text using the current local time.
///
/// `None` and `Some("")` both mean the provider produced no usable output.
pub fn normalize(raw_text: Option<&str>) -> ExtractionResult {
    normalize_at(raw_text, Local::now().naive_local())
}

/// Normalize provider text as of `at`.
pub fn normalize_at(raw_text: Option<&str>, at: NaiveDateTime) -> ExtractionResult {
    let raw = match raw_text {
        Some(text) if !text.is_empty() => text,
        _ => {
            return ExtractionResult::new(
                String::new(),
                NO_DATA_DISPLAY.to_string(),
                SummaryStats::no_data(),
            );
        }
    };

    let stats = SummaryStats {
        status: ExtractionStatus::Success,
        counts: Some(TextCounts {
            character_count: raw.chars().count(),
            word_count: raw.split_whitespace().count(),
            line_count: raw.split('\n').count(),
            timestamp: format_iso_timestamp(at),
        }),
    };

    ExtractionResult::new(raw.to_string(), format_extracted_text(raw, at), stats)
}

/// Wrap `raw` in a timestamp header and separator rules. The text itself is
/// copied verbatim.
pub fn format_extracted_text(raw: &str, at: NaiveDateTime) -> String {
    if raw.is_empty() {
        return NO_DATA_DISPLAY.to_string();
    }

    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "Extraction Timestamp: {}\n\n{rule}\n{raw}\n{rule}",
        at.format(HEADER_TIMESTAMP_FORMAT)
    )
}

/// ISO-8601 timestamp with microseconds, as used for stats and records.
pub fn format_iso_timestamp(at: NaiveDateTime) -> String {
    at.format(ISO_TIMESTAMP_FORMAT).to_string()
}
