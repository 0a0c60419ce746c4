//! Checks on user-supplied input before anything is sent to a provider.

use std::path::Path;

/// File extensions accepted for upload.
pub const SUPPORTED_FILE_TYPES: &[&str] = &["png", "jpg", "jpeg", "pdf", "bmp", "gif"];

/// Minimum length of a plausible API key.
pub const MIN_API_KEY_LEN: usize = 10;

/// Whether `api_key` looks usable: non-empty and at least
/// [`MIN_API_KEY_LEN`] characters once trimmed.
pub fn validate_api_key(api_key: &str) -> bool {
    api_key.trim().chars().count() >= MIN_API_KEY_LEN
}

/// Whether `path` has one of the [`SUPPORTED_FILE_TYPES`] extensions (case-insensitive).
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_FILE_TYPES.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Name offered when saving extracted text for `original_name`.
pub fn download_file_name(original_name: &str) -> String {
    format!("extracted_entities_{}.txt", original_name)
}
