//! Request payloads sent to vision providers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use docent_core::ExtractionPrompt;

use crate::Result;

/// JPEG image ready to be sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImagePayload {
    /// MIME type of every payload.
    pub const MIME_TYPE: &'static str = "image/jpeg";

    /// Decode an uploaded file and re-encode it as RGB JPEG.
    ///
    /// Any format the `image` crate can read is accepted. Alpha and palette
    /// images are flattened to RGB first.
    pub fn from_bytes(data: &[u8], quality: u8) -> Result<Self> {
        let decoded = image::load_from_memory(data)?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut bytes = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)))?;

        debug!(
            width,
            height,
            input_bytes = data.len(),
            jpeg_bytes = bytes.len(),
            "Prepared image payload"
        );

        Ok(Self {
            bytes,
            width,
            height,
        })
    }

    /// JPEG bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Standard base64 encoding of the JPEG bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:` URI embedding the image.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", Self::MIME_TYPE, self.to_base64())
    }
}

/// Everything a provider needs for one extraction: instruction text and image.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub prompt: ExtractionPrompt,
    pub image: ImagePayload,
}

impl VisionRequest {
    pub fn new(prompt: ExtractionPrompt, image: ImagePayload) -> Self {
        Self { prompt, image }
    }
}
