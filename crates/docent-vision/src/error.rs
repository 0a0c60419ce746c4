//! Error types for the provider layer.

use thiserror::Error;

/// Errors that can occur while asking a vision provider to read a document.
#[derive(Error, Debug)]
pub enum VisionError {
    /// Missing or invalid settings (unknown provider, bad API key).
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be sent or timed out.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status or refused the request.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider's response did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The uploaded file could not be decoded or re-encoded as an image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<reqwest::Error> for VisionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            VisionError::Parse(err.to_string())
        } else if err.is_connect() || err.is_timeout() {
            VisionError::Network(format!(
                "{err}. Check your internet connection and try again."
            ))
        } else {
            VisionError::Network(err.to_string())
        }
    }
}
