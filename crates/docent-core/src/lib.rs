//! Core library for document entity extraction.
//!
//! This crate provides:
//! - Document type registry (expected fields per document type)
//! - Prompt building for vision-capable LLM providers
//! - Normalization of provider responses into results with summary statistics
//! - The record shape used by the history store
//!
//! Nothing here talks to a provider or a database.

pub mod error;
pub mod extraction;
pub mod input;
pub mod models;

pub use error::ConfigError;
pub use extraction::{build_prompt, fields_for, fields_for_label, normalize, ExtractionPrompt};
pub use input::{download_file_name, is_supported_file, validate_api_key, SUPPORTED_FILE_TYPES};
pub use models::{
    DocentConfig, DocumentType, ExtractionRecord, ExtractionResult, ExtractionStatus,
    SummaryStats,
};
