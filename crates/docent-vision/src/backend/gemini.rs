//! Gemini `generateContent` backend (image plus text parts).

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ClientOptions, Provider, VisionProvider};
use crate::{ImagePayload, Result, VisionError, VisionRequest};

/// Provider that calls Gemini directly with inline image data.
pub struct GeminiVision {
    http_client: reqwest::Client,
    options: ClientOptions,
}

impl GeminiVision {
    pub fn new(options: ClientOptions) -> Result<Self> {
        Ok(Self {
            http_client: options.http_client()?,
            options,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.options.base_url, self.options.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn build_request(temperature: f32, request: &VisionRequest) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: request.prompt.as_str(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: ImagePayload::MIME_TYPE,
                        data: request.image.to_base64(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig { temperature },
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_response(body: &str) -> Result<String> {
    let raw: GenerateResponse =
        serde_json::from_str(body).map_err(|e| VisionError::Parse(e.to_string()))?;

    if let Some(reason) = raw.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(VisionError::Api {
            status: 200,
            message: format!("request blocked: {}", reason),
        });
    }

    let candidate = raw
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| VisionError::Parse("response contained no candidates".into()))?;

    Ok(candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default())
}

#[async_trait]
impl VisionProvider for GeminiVision {
    async fn extract(&self, request: &VisionRequest) -> Result<String> {
        let start = Instant::now();
        let body = build_request(self.options.temperature, request);

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.options.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                VisionError::from(e)
            })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            warn!(status = %status, error = %text, "Gemini API error");
            return Err(VisionError::Api {
                status: status.as_u16(),
                message: if text.is_empty() {
                    "Invalid key or model?".to_string()
                } else {
                    text
                },
            });
        }

        let content = parse_response(&text)?;

        debug!(
            model = %self.options.model,
            duration_ms = start.elapsed().as_millis(),
            chars = content.len(),
            "Gemini extraction complete"
        );

        Ok(content)
    }

    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        &self.options.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_core::{build_prompt, DocumentType};
    use image::{DynamicImage, ImageFormat, RgbImage};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn sample_request() -> VisionRequest {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(2, 2))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        let image = ImagePayload::from_bytes(&buf.into_inner(), 75).unwrap();
        VisionRequest::new(build_prompt(DocumentType::Receipt), image)
    }

    #[test]
    fn test_request_shape() {
        let request = sample_request();
        let body = serde_json::to_value(build_request(0.0, &request)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], request.prompt.as_str());
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], request.image.to_base64());
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
    }

    #[test]
    fn test_parse_joins_parts() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Store Name: ACME\n" }, { "text": "Total Amount: 9.99" } ] } }
            ]
        }"#;

        assert_eq!(
            parse_response(body).unwrap(),
            "Store Name: ACME\nTotal Amount: 9.99"
        );
    }

    #[test]
    fn test_parse_candidate_without_content() {
        let body = r#"{ "candidates": [ { "finishReason": "SAFETY" } ] }"#;
        assert_eq!(parse_response(body).unwrap(), "");
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let body = r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#;
        let err = parse_response(body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
