//! Expected fields per document type.

use crate::models::DocumentType;

/// Ordered field names expected for a document type. Order is display order.
pub type FieldSpec = &'static [&'static str];

const INVOICE_FIELDS: FieldSpec = &[
    "Invoice Number",
    "Invoice Date",
    "Vendor Name",
    "Customer Name",
    "Line Items",
    "Subtotal",
    "Tax",
    "Total Amount",
];

const RECEIPT_FIELDS: FieldSpec = &[
    "Store Name",
    "Receipt Number",
    "Date and Time",
    "Items Purchased",
    "Subtotal",
    "Tax",
    "Total Amount",
    "Payment Method",
];

const EMAIL_FIELDS: FieldSpec = &[
    "From",
    "To",
    "Date",
    "Subject",
    "Body Content",
    "Attachments",
];

const GENERAL_DOCUMENT_FIELDS: FieldSpec = &[
    "Document Title",
    "Date",
    "Author/Sender",
    "Key Entities",
    "Summary",
];

/// Field names expected for `doc_type`.
///
/// `AutoDetect` resolves to the general document fields.
pub fn fields_for(doc_type: DocumentType) -> FieldSpec {
    match doc_type.resolve() {
        DocumentType::Invoice => INVOICE_FIELDS,
        DocumentType::Receipt => RECEIPT_FIELDS,
        DocumentType::Email => EMAIL_FIELDS,
        DocumentType::GeneralDocument | DocumentType::AutoDetect => GENERAL_DOCUMENT_FIELDS,
    }
}

/// Field names for an untrusted label. Unknown labels get the general document fields.
pub fn fields_for_label(label: &str) -> FieldSpec {
    fields_for(DocumentType::from_label(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_type_has_fields() {
        for doc_type in DocumentType::ALL {
            assert!(!fields_for(doc_type).is_empty(), "{doc_type} has no fields");
        }
    }

    #[test]
    fn test_invoice_fields() {
        let fields = fields_for_label("Invoice");
        assert!(fields.contains(&"Invoice Number"));
        assert!(fields.contains(&"Total Amount"));
        assert_eq!(fields[0], "Invoice Number");
    }

    #[test]
    fn test_unknown_label_falls_back_to_general() {
        let fields = fields_for_label("NotARealType");
        assert_eq!(fields, fields_for(DocumentType::GeneralDocument));
        assert!(fields.contains(&"Document Title"));
        assert!(fields.contains(&"Summary"));
    }

    #[test]
    fn test_auto_detect_matches_general() {
        assert_eq!(
            fields_for(DocumentType::AutoDetect),
            fields_for(DocumentType::GeneralDocument)
        );
    }

    #[test]
    fn test_email_field_order() {
        assert_eq!(
            fields_for(DocumentType::Email),
            &["From", "To", "Date", "Subject", "Body Content", "Attachments"]
        );
    }
}
