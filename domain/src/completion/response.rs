//! Generic completion response types

use crate::core::family::Family;
use serde::{Deserialize, Serialize};

/// Token counts reported by a vendor for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Combined input + output count
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// A vendor-neutral completion response.
///
/// Produced once per successful invocation and never mutated. `usage` is
/// only present when the vendor reported it; estimation is the invoker's
/// concern, not the adapter's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text.
    pub text: String,
    /// Vendor-reported token counts, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Resolved model identifier.
    pub model: String,
    /// Family that served the request.
    pub family: Family,
}

impl CompletionResponse {
    pub fn new(text: impl Into<String>, model: impl Into<String>, family: Family) -> Self {
        Self {
            text: text.into(),
            usage: None,
            model: model.into(),
            family,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_total() {
        let usage = TokenUsage::new(100, 25);
        assert_eq!(usage.total(), 125);
    }

    #[test]
    fn test_response_builder() {
        let response = CompletionResponse::new("4", "deepseek-chat", Family::DeepSeek)
            .with_usage(TokenUsage::new(12, 1));

        assert_eq!(response.text, "4");
        assert_eq!(response.model, "deepseek-chat");
        assert_eq!(response.family, Family::DeepSeek);
        assert_eq!(response.usage.unwrap().total(), 13);
    }
}
