//! Resilient invocation of one vendor adapter.
//!
//! [`ResilientInvoker`] wraps a [`VendorAdapter`] with a bounded retry loop:
//! up to 3 attempts, each raced against a 30-second deadline, with
//! exponential backoff between attempts and a doubled delay when the
//! failure looks rate-limited. All failures are retried identically up to
//! the cap; the rate-limit heuristic only stretches the backoff. On success
//! the invoker records token usage into the ledger, estimating counts when
//! the vendor did not report any.

use crate::ports::vendor_adapter::{VendorAdapter, VendorError};
use conclave_domain::{CompletionRequest, CompletionResponse, Family, TokenUsage, UsageLedger};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by [`ResilientInvoker::complete`]
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Final failure after exhausting all attempts.
    #[error("{family} invocation failed after {attempts} attempts: {last_error}")]
    Exhausted {
        family: Family,
        attempts: u32,
        last_error: String,
    },
}

/// Retry/backoff/timeout parameters, injected at construction
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum adapter calls per `complete` invocation.
    pub max_attempts: u32,
    /// Hard deadline for each attempt.
    pub attempt_timeout: Duration,
    /// Backoff unit; attempt k waits `2^(k-1)` units after failing.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(30),
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Backoff after `failed_attempt` (1-indexed): `2^(failed_attempt-1)`
    /// base units, doubled when the failure was rate-limited.
    pub fn backoff_delay(&self, failed_attempt: u32, rate_limited: bool) -> Duration {
        let mut factor = 1u32 << (failed_attempt.saturating_sub(1)).min(16);
        if rate_limited {
            factor *= 2;
        }
        self.base_delay * factor
    }
}

/// Heuristic rate-limit classification over a failure message
pub fn is_rate_limited(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rate limit") || lower.contains("429") || lower.contains("too many requests")
}

/// Rough token estimate when a vendor reports no usage: one token per
/// four characters, rounded up.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

/// How one attempt failed
#[derive(Debug)]
enum AttemptFailure {
    Timeout(Duration),
    Vendor(VendorError),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Timeout(limit) => {
                write!(f, "attempt timed out after {}s", limit.as_secs())
            }
            AttemptFailure::Vendor(e) => write!(f, "{}", e),
        }
    }
}

/// One vendor adapter wrapped with retry, backoff and timeouts.
///
/// The invoker is the sole place that decides retry vs. fail; callers see
/// either a successful response or one [`InvokeError::Exhausted`] carrying
/// the family, attempt count and last underlying failure.
pub struct ResilientInvoker {
    adapter: Arc<dyn VendorAdapter>,
    model: String,
    policy: RetryPolicy,
    ledger: Arc<UsageLedger>,
}

impl std::fmt::Debug for ResilientInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientInvoker")
            .field("family", &self.adapter.family())
            .field("model", &self.model)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ResilientInvoker {
    pub fn new(
        adapter: Arc<dyn VendorAdapter>,
        model: impl Into<String>,
        policy: RetryPolicy,
        ledger: Arc<UsageLedger>,
    ) -> Self {
        Self {
            adapter,
            model: model.into(),
            policy,
            ledger,
        }
    }

    /// The family this invoker serves
    pub fn family(&self) -> Family {
        self.adapter.family()
    }

    /// The model this invoker was configured with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Perform a completion, retrying transient failures.
    ///
    /// Attempts for one request are strictly sequential: attempt N's
    /// backoff completes before attempt N+1 starts. The per-attempt
    /// deadline stops the wait, not the in-flight request.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, InvokeError> {
        let family = self.family();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(%family, attempt, "invoking vendor adapter");

            let failure =
                match tokio::time::timeout(self.policy.attempt_timeout, self.adapter.invoke(request))
                    .await
                {
                    Ok(Ok(response)) => return Ok(self.settle(request, response)),
                    Ok(Err(e)) => AttemptFailure::Vendor(e),
                    Err(_) => AttemptFailure::Timeout(self.policy.attempt_timeout),
                };

            let message = failure.to_string();
            let rate_limited = is_rate_limited(&message);
            warn!(%family, attempt, rate_limited, "attempt failed: {}", message);

            if attempt >= self.policy.max_attempts {
                return Err(InvokeError::Exhausted {
                    family,
                    attempts: attempt,
                    last_error: message,
                });
            }

            let delay = self.policy.backoff_delay(attempt, rate_limited);
            debug!(%family, delay_ms = delay.as_millis() as u64, "backing off before retry");
            tokio::time::sleep(delay).await;
        }
    }

    /// Fill in token usage (estimating when absent) and record it.
    fn settle(
        &self,
        request: &CompletionRequest,
        mut response: CompletionResponse,
    ) -> CompletionResponse {
        let usage = response.usage.unwrap_or_else(|| {
            let serialized = serde_json::to_string(request).unwrap_or_default();
            TokenUsage::new(
                estimate_tokens(&serialized),
                estimate_tokens(&response.text),
            )
        });
        response.usage = Some(usage);

        self.ledger.record(
            response.family.clone(),
            &response.model,
            usage.input_tokens,
            usage.output_tokens,
        );
        response
    }
}
