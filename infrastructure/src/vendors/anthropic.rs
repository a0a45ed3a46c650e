//! Anthropic messages API adapter.
//!
//! `POST {base}/v1/messages` with `x-api-key` and `anthropic-version`
//! headers. System-role messages are pulled out of the sequence and
//! concatenated into the top-level `system` field; the conversational
//! remainder must start with a user turn, so an empty or assistant-led
//! sequence gets a synthetic `{role: user, content: "Hello"}` prepended.
//! That placeholder is a compatibility quirk the wire format depends on;
//! keep it as-is.

use super::error_from_response;
use async_trait::async_trait;
use conclave_application::{VendorAdapter, VendorError};
use conclave_domain::{CompletionRequest, CompletionResponse, Family, Role, TokenUsage};
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 1.0;

// ==================== Wire types ====================

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct MessagesRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Option<WireUsage>,
    pub model: String,
}

/// Build the wire request from a generic completion request.
pub(crate) fn build_request(model: &str, request: &CompletionRequest) -> MessagesRequest {
    // All system content, request-level prompt first, joined by blank lines.
    let mut system_parts: Vec<&str> = Vec::new();
    if let Some(system) = &request.system {
        system_parts.push(system);
    }
    system_parts.extend(request.system_messages().map(|m| m.content.as_str()));
    let system = if system_parts.is_empty() {
        None
    } else {
        Some(system_parts.join("\n\n"))
    };

    let mut messages: Vec<WireMessage> = request
        .conversational()
        .map(|m| WireMessage {
            role: m.role.as_str(),
            content: m.content.clone(),
        })
        .collect();

    if messages.first().map(|m| m.role) != Some(Role::User.as_str()) {
        messages.insert(
            0,
            WireMessage {
                role: "user",
                content: "Hello".to_string(),
            },
        );
    }

    MessagesRequest {
        model: model.to_string(),
        messages,
        max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        system,
    }
}

/// Normalize the wire response: text blocks joined by newline.
pub(crate) fn parse_response(wire: MessagesResponse) -> CompletionResponse {
    let text = wire
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut response = CompletionResponse::new(text, wire.model, Family::Anthropic);
    if let Some(usage) = wire.usage {
        response = response.with_usage(TokenUsage::new(usage.input_tokens, usage.output_tokens));
    }
    response
}

/// Adapter for the Anthropic messages API
pub struct AnthropicAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicAdapter {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl VendorAdapter for AnthropicAdapter {
    fn family(&self) -> Family {
        Family::Anthropic
    }

    async fn invoke(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, VendorError> {
        let wire_request = build_request(&self.model, request);
        debug!(model = %self.model, messages = wire_request.messages.len(), "calling messages API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| VendorError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let wire: MessagesResponse = response
            .json()
            .await
            .map_err(|e| VendorError::Protocol(e.to_string()))?;
        Ok(parse_response(wire))
    }
}
