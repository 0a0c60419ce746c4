//! WASM bindings for docent.
//!
//! Browsers call the provider themselves; these bindings supply the prompt
//! for a document type and normalize whatever text comes back.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use docent_core::{DocumentType, ExtractionResult};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Document type labels in menu order.
#[wasm_bindgen]
pub fn document_types() -> Result<JsValue, JsValue> {
    let labels: Vec<&str> = DocumentType::ALL.iter().map(|t| t.label()).collect();
    to_js(&labels)
}

/// Fields extracted for a document type label. Unknown labels get the
/// General Document fields.
#[wasm_bindgen]
pub fn fields_for(label: &str) -> Result<JsValue, JsValue> {
    to_js(&docent_core::fields_for_label(label))
}

/// Prompt text for a document type label.
#[wasm_bindgen]
pub fn build_prompt(label: &str) -> String {
    docent_core::build_prompt(DocumentType::from_label(label)).into_string()
}

/// Normalize a provider response into `{ raw_text, formatted, stats }`.
///
/// `undefined`, `null` and `""` all produce the "No data" result.
#[wasm_bindgen]
pub fn normalize(raw: Option<String>) -> Result<JsValue, JsValue> {
    to_js(&docent_core::normalize(raw.as_deref()))
}

#[wasm_bindgen]
pub fn validate_api_key(api_key: &str) -> bool {
    docent_core::validate_api_key(api_key)
}

/// Accepted upload extensions, lowercase and without the dot.
#[wasm_bindgen]
pub fn supported_file_types() -> Result<JsValue, JsValue> {
    to_js(&docent_core::SUPPORTED_FILE_TYPES)
}

#[wasm_bindgen]
pub fn is_supported_file(file_name: &str) -> bool {
    docent_core::is_supported_file(std::path::Path::new(file_name))
}

/// Suggested name when saving the extracted text of `file_name`.
#[wasm_bindgen]
pub fn download_file_name(file_name: &str) -> String {
    docent_core::download_file_name(file_name)
}

/// Extraction session bound to one document type.
#[wasm_bindgen]
pub struct DocumentExtractor {
    document_type: DocumentType,
    last: Option<ExtractionResult>,
}

#[wasm_bindgen]
impl DocumentExtractor {
    /// Create an extractor for a document type label.
    #[wasm_bindgen(constructor)]
    pub fn new(label: &str) -> Self {
        Self {
            document_type: DocumentType::from_label(label),
            last: None,
        }
    }

    /// Label of the document type actually used for prompting.
    #[wasm_bindgen(getter)]
    pub fn document_type(&self) -> String {
        self.document_type.resolve().label().to_string()
    }

    /// Prompt to send along with the image.
    #[wasm_bindgen]
    pub fn prompt(&self) -> String {
        docent_core::build_prompt(self.document_type).into_string()
    }

    #[wasm_bindgen]
    pub fn fields(&self) -> Result<JsValue, JsValue> {
        to_js(&docent_core::fields_for(self.document_type))
    }

    /// Normalize a provider response and remember it.
    #[wasm_bindgen]
    pub fn accept(&mut self, raw: Option<String>) -> Result<JsValue, JsValue> {
        let result = docent_core::normalize(raw.as_deref());
        let value = to_js(&result)?;
        self.last = Some(result);
        Ok(value)
    }

    /// Display text of the last accepted response.
    #[wasm_bindgen]
    pub fn formatted(&self) -> Option<String> {
        self.last.as_ref().map(|r| r.formatted().to_string())
    }
}
