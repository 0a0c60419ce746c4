//! Extraction prompt rendering.

use std::fmt;

use tracing::debug;

use super::registry::fields_for;
use crate::models::DocumentType;

const PREAMBLE: &str = "You are an expert document analyzer. \
Extract all relevant entities from the provided document image.";

const FIELDS_HEADER: &str = "Please extract and structure the following information:";

const CLOSING: &str = "Format your response as a structured list with a clear label and value for each field above.\n\
If a field is not present in the document, mark it as \"Not found\".\n\
Be thorough and extract all visible information from the document.";

/// Instruction text sent to a vision provider alongside the image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractionPrompt(String);

impl ExtractionPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ExtractionPrompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractionPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render the extraction prompt for `doc_type`.
///
/// Callers are expected to resolve `AutoDetect` first; it is resolved here as
/// well so the output never names the auto-detect label.
pub fn build_prompt(doc_type: DocumentType) -> ExtractionPrompt {
    let doc_type = doc_type.resolve();
    let fields = fields_for(doc_type);

    let mut prompt = String::with_capacity(512);
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\nDocument Type: ");
    prompt.push_str(doc_type.label());
    prompt.push_str("\n\n");
    prompt.push_str(FIELDS_HEADER);
    prompt.push('\n');
    for field in fields {
        prompt.push_str("- ");
        prompt.push_str(field);
        prompt.push('\n');
    }
    prompt.push('\n');
    prompt.push_str(CLOSING);
    prompt.push('\n');

    debug!(
        document_type = doc_type.label(),
        fields = fields.len(),
        "Built extraction prompt"
    );

    ExtractionPrompt(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Field names listed in the prompt, in order.
    fn listed_fields(prompt: &ExtractionPrompt) -> Vec<&str> {
        prompt
            .as_str()
            .lines()
            .filter_map(|line| line.strip_prefix("- "))
            .collect()
    }

    #[test]
    fn test_prompt_is_deterministic() {
        for doc_type in DocumentType::ALL {
            assert_eq!(build_prompt(doc_type), build_prompt(doc_type));
        }
    }

    #[test]
    fn test_prompt_lists_fields_in_order() {
        for doc_type in DocumentType::ALL {
            let prompt = build_prompt(doc_type);
            assert_eq!(listed_fields(&prompt), fields_for(doc_type).to_vec());
        }
    }

    #[test]
    fn test_invoice_prompt() {
        let prompt = build_prompt(DocumentType::Invoice);

        assert!(prompt.as_str().starts_with("You are an expert document analyzer."));
        assert!(prompt.as_str().contains("Document Type: Invoice\n"));
        assert!(prompt.as_str().lines().any(|l| l == "- Invoice Number"));
        assert!(prompt.as_str().contains("\"Not found\""));
    }

    #[test]
    fn test_auto_detect_renders_general_document() {
        let prompt = build_prompt(DocumentType::AutoDetect);

        assert_eq!(prompt, build_prompt(DocumentType::GeneralDocument));
        assert!(prompt.as_str().contains("Document Type: General Document"));
        assert!(!prompt.as_str().contains("Auto-detect"));
    }

    #[test]
    fn test_unknown_label_renders_general_document() {
        let prompt = build_prompt(DocumentType::from_label("NotARealType"));
        assert!(prompt.as_str().contains("- Document Title\n"));
        assert!(prompt.as_str().contains("- Summary\n"));
    }
}
