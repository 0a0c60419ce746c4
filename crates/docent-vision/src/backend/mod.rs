//! Vision provider implementations.

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "gemini")]
pub mod gemini;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use docent_core::models::ProviderConfig;
use docent_core::validate_api_key;
use tracing::debug;

use crate::{Result, VisionError, VisionRequest};

/// Hosted AI providers that can read document images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Gemini,
}

const OPENAI_MODELS: &[&str] = &["gpt-4-vision-preview", "gpt-4o", "gpt-4o-mini"];
const GEMINI_MODELS: &[&str] = &["gemini-pro-vision", "gemini-1.5-pro", "gemini-1.5-flash"];

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Gemini];

    /// Short identifier used in config files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }

    /// Name shown to users and stored with history records.
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Gemini => "Google Gemini",
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_env(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Gemini => "GOOGLE_API_KEY",
        }
    }

    /// Vision-capable models offered for this provider.
    pub fn models(self) -> &'static [&'static str] {
        match self {
            Provider::OpenAi => OPENAI_MODELS,
            Provider::Gemini => GEMINI_MODELS,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Gemini => "gemini-1.5-pro",
        }
    }

    /// Return `model` if this provider offers it, otherwise the default model.
    pub fn resolve_model(self, model: &str) -> &'static str {
        self.models()
            .iter()
            .copied()
            .find(|m| *m == model)
            .unwrap_or_else(|| self.default_model())
    }

    /// Model configured for this provider in `config`.
    pub fn configured_model(self, config: &ProviderConfig) -> &str {
        match self {
            Provider::OpenAi => &config.openai_model,
            Provider::Gemini => &config.gemini_model,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = VisionError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "openai" => Ok(Provider::OpenAi),
            "gemini" | "google" | "googlegemini" => Ok(Provider::Gemini),
            _ => Err(VisionError::Config(format!(
                "unknown provider '{}' (expected 'openai' or 'gemini')",
                s
            ))),
        }
    }
}

/// Trait for vision providers.
///
/// Each implementation formats the prompt and image the way its API expects
/// and returns the model's free-text answer. An empty string means the model
/// answered with nothing.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Send the prompt and image, returning the model's raw text.
    async fn extract(&self, request: &VisionRequest) -> Result<String>;

    /// Which provider this is.
    fn provider(&self) -> Provider;

    /// Model used for requests.
    fn model(&self) -> &str;
}

/// Connection settings shared by all providers.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ClientOptions {
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| VisionError::Config(format!("failed to build HTTP client: {}", e)))
    }
}

/// Build a provider from configuration.
///
/// `model` falls back to the configured model, and unknown models fall back
/// to the provider default.
pub fn create_provider(
    provider: Provider,
    api_key: &str,
    model: Option<&str>,
    config: &ProviderConfig,
) -> Result<Box<dyn VisionProvider>> {
    if !validate_api_key(api_key) {
        return Err(VisionError::Config(format!(
            "invalid {} API key (set {} or pass --api-key)",
            provider.display_name(),
            provider.api_key_env()
        )));
    }

    let requested = model.unwrap_or_else(|| provider.configured_model(config));
    let resolved = provider.resolve_model(requested);
    if resolved != requested {
        debug!(requested, resolved, "Unknown model, using provider default");
    }

    let base_url = match provider {
        Provider::OpenAi => &config.openai_base_url,
        Provider::Gemini => &config.gemini_base_url,
    };

    let options = ClientOptions {
        api_key: api_key.trim().to_string(),
        model: resolved.to_string(),
        base_url: base_url.trim_end_matches('/').to_string(),
        temperature: config.temperature,
        timeout: Duration::from_secs(config.timeout_secs),
    };

    match provider {
        #[cfg(feature = "openai")]
        Provider::OpenAi => Ok(Box::new(openai::OpenAiVision::new(options)?)),
        #[cfg(feature = "gemini")]
        Provider::Gemini => Ok(Box::new(gemini::GeminiVision::new(options)?)),
        #[allow(unreachable_patterns)]
        other => Err(VisionError::Config(format!(
            "{} support is not enabled in this build",
            other.display_name()
        ))),
    }
}
