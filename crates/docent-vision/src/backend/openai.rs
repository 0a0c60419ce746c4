//! OpenAI-style chat completions backend (multimodal user message).

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ClientOptions, Provider, VisionProvider};
use crate::{Result, VisionError, VisionRequest};

/// Provider that sends the prompt and a base64 data URI in one chat message.
pub struct OpenAiVision {
    http_client: reqwest::Client,
    options: ClientOptions,
}

impl OpenAiVision {
    pub fn new(options: ClientOptions) -> Result<Self> {
        Ok(Self {
            http_client: options.http_client()?,
            options,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.options.base_url)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

fn build_request<'a>(model: &'a str, temperature: f32, request: &'a VisionRequest) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: vec![
                ContentPart::Text {
                    text: request.prompt.as_str(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: request.image.to_data_uri(),
                    },
                },
            ],
        }],
        temperature,
    }
}

fn parse_response(body: &str) -> Result<String> {
    let raw: ChatResponseRaw =
        serde_json::from_str(body).map_err(|e| VisionError::Parse(e.to_string()))?;

    raw.choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or_else(|| VisionError::Parse("response contained no choices".into()))
}

#[async_trait]
impl VisionProvider for OpenAiVision {
    async fn extract(&self, request: &VisionRequest) -> Result<String> {
        let start = Instant::now();
        let body = build_request(&self.options.model, self.options.temperature, request);

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.options.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                VisionError::from(e)
            })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            warn!(status = %status, error = %text, "OpenAI API error");
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
            "OpenAI extraction complete"
        );

        Ok(content)
    }

    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn model(&self) -> &str {
        &self.options.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImagePayload;
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
        VisionRequest::new(build_prompt(DocumentType::Invoice), image)
    }

    #[test]
    fn test_request_shape() {
        let request = sample_request();
        let body = serde_json::to_value(build_request("gpt-4o", 0.0, &request)).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "user");

        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], request.prompt.as_str());
        assert_eq!(content[1]["type"], "image_url");
        assert!(content[1]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Invoice Number: 42"}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Invoice Number: 42");
    }

    #[test]
    fn test_parse_null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "");
    }

    #[test]
    fn test_parse_no_choices() {
        assert!(matches!(
            parse_response(r#"{"choices":[]}"#),
            Err(VisionError::Parse(_))
        ));
        assert!(matches!(parse_response("<html>"), Err(VisionError::Parse(_))));
    }
}
