//! Vendor HTTP adapters.
//!
//! One adapter per wire protocol: the Anthropic messages API, the
//! OpenAI-compatible chat API (deepseek, mistral, xai), and the echo
//! fallback for families with no real integration yet. Adapters translate
//! the generic request, perform the call, and normalize the response;
//! retry and token estimation stay in the invoker.

pub mod anthropic;
pub mod echo;
pub mod openai_compat;

use conclave_application::VendorError;

/// Turn a non-success HTTP response into a vendor error carrying the
/// status and body text.
pub(crate) async fn error_from_response(response: reqwest::Response) -> VendorError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    VendorError::Http { status, body }
}
