//! Extraction request/response contract.
//!
//! The registry decides which fields a document type has, the prompt builder
//! turns that into instruction text, and the normalizer turns whatever the
//! provider sends back into an [`ExtractionResult`](crate::models::ExtractionResult).
//! All three are pure and safe to call from any thread.

mod normalize;
mod prompt;
mod registry;

pub use normalize::{
    format_extracted_text, format_iso_timestamp, normalize, normalize_at, NO_DATA_DISPLAY,
    RULE_WIDTH,
};
pub use prompt::{build_prompt, ExtractionPrompt};
pub use registry::{fields_for, fields_for_label, FieldSpec};
