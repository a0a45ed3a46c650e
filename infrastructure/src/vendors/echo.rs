//! Echo fallback adapter.
//!
//! Serves any family without a real vendor integration. It performs no
//! network I/O, never errors, and reports usage estimated from input
//! length, which lets callers exercise routing, accounting and council
//! wiring before a vendor exists. This is the designed fallback for
//! unrecognized families, not a stub.

use async_trait::async_trait;
use conclave_application::invoker::estimate_tokens;
use conclave_application::{VendorAdapter, VendorError};
use conclave_domain::{CompletionRequest, CompletionResponse, Family, TokenUsage};

/// No-op adapter echoing the last conversational message
pub struct EchoAdapter {
    family: Family,
    model: String,
}

impl EchoAdapter {
    pub fn new(family: Family, model: impl Into<String>) -> Self {
        Self {
            family,
            model: model.into(),
        }
    }
}

#[async_trait]
impl VendorAdapter for EchoAdapter {
    fn family(&self) -> Family {
        self.family.clone()
    }

    async fn invoke(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, VendorError> {
        let text = request
            .conversational()
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let input: u64 = request
            .messages
            .iter()
            .map(|m| estimate_tokens(&m.content))
            .sum();
        let output = estimate_tokens(&text);

        Ok(
            CompletionResponse::new(text, self.model.clone(), self.family.clone())
                .with_usage(TokenUsage::new(input, output)),
        )
    }
}
