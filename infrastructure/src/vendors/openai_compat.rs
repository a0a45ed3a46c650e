//! OpenAI-compatible chat API adapter.
//!
//! One adapter serves the three vendors that speak this protocol
//! (deepseek, mistral, xai): `POST {base}/chat/completions` with a Bearer
//! token. The message sequence goes over the wire as-is, system messages
//! included inline; only the default temperature varies by vendor.

use super::error_from_response;
use async_trait::async_trait;
use conclave_application::{VendorAdapter, VendorError};
use conclave_domain::{CompletionRequest, CompletionResponse, Family, TokenUsage};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Vendor-specific default sampling temperature.
pub(crate) fn default_temperature(family: &Family) -> f32 {
    match family {
        Family::Mistral => 0.7,
        _ => 1.0,
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct WireResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    #[serde(default)]
    pub message: WireResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<WireUsage>,
    pub model: Option<String>,
}

/// Build the wire request: messages pass through unmodified.
pub(crate) fn build_request(
    family: &Family,
    model: &str,
    request: &CompletionRequest,
) -> ChatRequest {
    let mut messages: Vec<WireMessage> = Vec::new();
    if let Some(system) = &request.system {
        messages.push(WireMessage {
            role: "system",
            content: system.clone(),
        });
    }
    messages.extend(request.messages.iter().map(|m| WireMessage {
        role: m.role.as_str(),
        content: m.content.clone(),
    }));

    ChatRequest {
        model: model.to_string(),
        messages,
        max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: request.temperature.unwrap_or(default_temperature(family)),
    }
}

/// Normalize the wire response: first choice's content, empty if absent.
pub(crate) fn parse_response(
    family: &Family,
    configured_model: &str,
    wire: ChatResponse,
) -> CompletionResponse {
    let text = wire
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    let model = wire.model.unwrap_or_else(|| configured_model.to_string());
    let mut response = CompletionResponse::new(text, model, family.clone());
    if let Some(usage) = wire.usage {
        response = response.with_usage(TokenUsage::new(usage.prompt_tokens, usage.completion_tokens));
    }
    response
}

/// Adapter for OpenAI-compatible chat endpoints
pub struct OpenAiCompatAdapter {
    family: Family,
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatAdapter {
    pub fn new(
        family: Family,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            family,
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl VendorAdapter for OpenAiCompatAdapter {
    fn family(&self) -> Family {
        self.family.clone()
    }

    async fn invoke(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, VendorError> {
        let wire_request = build_request(&self.family, &self.model, request);
        debug!(family = %self.family, model = %self.model, "calling chat completions API");

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| VendorError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let wire: ChatResponse = response
            .json()
            .await
            .map_err(|e| VendorError::Protocol(e.to_string()))?;
        Ok(parse_response(&self.family, &self.model, wire))
    }
}
