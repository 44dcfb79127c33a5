// src/api/anthropic.rs

use super::{config, errors::GatewayError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single-shot client for the Anthropic Messages API.
pub struct AnthropicApi {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl fmt::Debug for AnthropicApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicApi")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AnthropicApi {
    /// Creates a new `AnthropicApi` instance.
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: config::ANTHROPIC_BASE_URL.to_string(),
            model,
            max_tokens,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sends `prompt` as a single user message and returns the text of the
    /// first content item of the reply.
    pub async fn create_message(&self, prompt: &str) -> Result<String, GatewayError> {
        log::debug!(
            "Calling Anthropic messages API (model {}, {} prompt bytes)",
            self.model,
            prompt.len()
        );

        let messages = [ApiMessage {
            role: "user",
            content: vec![TextBlock {
                kind: "text",
                text: prompt,
            }],
        }];
        let body = RequestBody {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: config::TEMPERATURE,
            system: config::TUTOR_SYSTEM_PROMPT,
            messages: &messages,
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", config::ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw_response = response.text().await?;

        if !status.is_success() {
            log::error!("Anthropic API error {}: {}", status, raw_response);
            return Err(GatewayError::ApiError {
                status: status.as_u16(),
                body: raw_response,
            });
        }

        let parsed: ApiResponse = serde_json::from_str(&raw_response)?;
        let answer = parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or(GatewayError::EmptyResponse {
                provider: "anthropic",
            })?;

        log::info!("Anthropic response received ({} bytes)", answer.len());
        Ok(answer)
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: &'a [ApiMessage<'a>],
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: Vec<TextBlock<'a>>,
}

#[derive(Serialize)]
struct TextBlock<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}
