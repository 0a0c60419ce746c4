//! Document type tags.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification label selecting which field set and prompt text to use.
///
/// `AutoDetect` is a label only. There is no classification step behind it;
/// it always resolves to `GeneralDocument` before a lookup or prompt is made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Auto-detect (alias for a general document).
    #[default]
    AutoDetect,
    /// Invoice issued by a vendor.
    Invoice,
    /// Store or point-of-sale receipt.
    Receipt,
    /// Email message (screenshot or printout).
    Email,
    /// Any other document.
    GeneralDocument,
}

impl DocumentType {
    /// All selectable document types, in menu order.
    pub const ALL: [DocumentType; 5] = [
        DocumentType::AutoDetect,
        DocumentType::Invoice,
        DocumentType::Receipt,
        DocumentType::Email,
        DocumentType::GeneralDocument,
    ];

    /// Human-readable label, as shown to users and sent in prompts.
    pub fn label(self) -> &'static str {
        match self {
            DocumentType::AutoDetect => "Auto-detect",
            DocumentType::Invoice => "Invoice",
            DocumentType::Receipt => "Receipt",
            DocumentType::Email => "Email",
            DocumentType::GeneralDocument => "General Document",
        }
    }

    /// Parse a label from an untrusted caller.
    ///
    /// Matching ignores case, whitespace, and punctuation, so "general document",
    /// "General-Document", and "GENERAL_DOCUMENT" are all accepted. Anything
    /// unrecognized becomes `GeneralDocument`.
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "invoice" => DocumentType::Invoice,
            "receipt" => DocumentType::Receipt,
            "email" | "mail" => DocumentType::Email,
            "autodetect" | "auto" => DocumentType::AutoDetect,
            _ => DocumentType::GeneralDocument,
        }
    }

    /// Resolve `AutoDetect` to `GeneralDocument`; every other type is returned as-is.
    pub fn resolve(self) -> Self {
        match self {
            DocumentType::AutoDetect => DocumentType::GeneralDocument,
            other => other,
        }
    }

    /// Whether this is the auto-detect label.
    pub fn is_auto_detect(self) -> bool {
        self == DocumentType::AutoDetect
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}
