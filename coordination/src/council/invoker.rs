//! Model invoker: one logical call with bounded retries.
//!
//! [`RetryingInvoker`] wraps a single-attempt [`ChatBackend`] with the
//! council's [`RetryPolicy`] and a per-attempt timeout. Every failure kind
//! (transport, status, timeout, malformed body) draws from the same attempt
//! budget. Once the budget is spent the call surfaces
//! [`InvokeError::ExhaustedRetries`] and nothing above retries again.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::backend::{CallFailure, ChatBackend, ChatRequest};
use crate::resilience::RetryPolicy;

/// A model call that failed on every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("model {model} failed after {attempts} attempts: {last}")]
    ExhaustedRetries {
        model: String,
        attempts: u32,
        last: CallFailure,
    },
}

impl InvokeError {
    /// The failure observed on the final attempt.
    pub fn last_failure(&self) -> &CallFailure {
        match self {
            Self::ExhaustedRetries { last, .. } => last,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::ExhaustedRetries { attempts, .. } => *attempts,
        }
    }
}

/// Returns the full generated text for one request, or fails for good.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, request: &ChatRequest) -> Result<String, InvokeError>;
}

/// [`ModelInvoker`] that retries a [`ChatBackend`] with exponential backoff.
pub struct RetryingInvoker<B> {
    backend: B,
    policy: RetryPolicy,
    timeout: Duration,
}

impl<B: ChatBackend> RetryingInvoker<B> {
    pub fn new(backend: B, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            backend,
            policy,
            timeout,
        }
    }

    async fn attempt(&self, request: &ChatRequest) -> Result<String, CallFailure> {
        match tokio::time::timeout(self.timeout, self.backend.complete(request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(CallFailure::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl<B: ChatBackend> ModelInvoker for RetryingInvoker<B> {
    async fn invoke(&self, request: &ChatRequest) -> Result<String, InvokeError> {
        let max_attempts = self.policy.effective_attempts();
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(model = %request.model, attempt = attempts, max_attempts, "calling model");

            let failure = match self.attempt(request).await {
                Ok(text) => {
                    debug!(
                        model = %request.model,
                        attempt = attempts,
                        chars = text.len(),
                        "model call succeeded"
                    );
                    return Ok(text);
                }
                Err(failure) => failure,
            };

            if !self.policy.should_retry(attempts) {
                error!(
                    model = %request.model,
                    attempts,
                    error = %failure,
                    "model call failed, retries exhausted"
                );
                return Err(InvokeError::ExhaustedRetries {
                    model: request.model.clone(),
                    attempts,
                    last: failure,
                });
            }

            let backoff = self.policy.backoff_duration(attempts);
            warn!(
                model = %request.model,
                attempt = attempts,
                max_attempts,
                backoff_secs = backoff.as_secs_f64(),
                error = %failure,
                "model call failed, retrying"
            );
            tokio::time::sleep(backoff).await;
        }
    }
}
