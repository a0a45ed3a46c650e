//! Vendor adapter port
//!
//! Defines the interface for one vendor backend. An adapter translates the
//! generic completion request into its vendor's wire format, performs the
//! HTTP call, and normalizes the response. Adapters surface raw vendor
//! failures; retry is the invoker's job, and token estimation is too.

use async_trait::async_trait;
use conclave_domain::{CompletionRequest, CompletionResponse, Family};
use thiserror::Error;

/// Errors surfaced by a vendor adapter
#[derive(Error, Debug)]
pub enum VendorError {
    /// Any non-success HTTP status, carrying the body text.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never got a usable HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The vendor answered with something the adapter cannot interpret.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// One vendor backend
///
/// Implementations (one per family wire protocol) live in the
/// infrastructure layer; the echo fallback covers families without one.
#[async_trait]
pub trait VendorAdapter: Send + Sync {
    /// The family this adapter serves
    fn family(&self) -> Family;

    /// Perform one completion call, no retries
    async fn invoke(&self, request: &CompletionRequest)
    -> Result<CompletionResponse, VendorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status_and_body() {
        let error = VendorError::Http {
            status: 429,
            body: "slow down".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("429"));
        assert!(message.contains("slow down"));
    }
}
