//! Data models for docent.

pub mod config;
pub mod document;
pub mod record;
pub mod result;

pub use config::{DocentConfig, ExtractionConfig, HistoryConfig, ProviderConfig};
pub use document::DocumentType;
pub use record::ExtractionRecord;
pub use result::{ExtractionResult, ExtractionStatus, SummaryStats, TextCounts};
