//! Single-attempt chat completion backends.
//!
//! A [`ChatBackend`] performs exactly one request and reports exactly one
//! outcome. Retries, backoff and per-attempt timeouts live one layer up in
//! [`super::invoker::RetryingInvoker`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CouncilConfig;

/// Failure of a single call attempt. Always retryable by the invoker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// One chat completion request: a system prompt plus one user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Sends one chat completion request to a model deployment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Perform one attempt and return the generated text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, CallFailure>;
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    messages: [WireMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

/// Azure OpenAI deployments API over plain HTTPS with key authentication.
#[derive(Clone)]
pub struct AzureChatBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_version: String,
}

impl AzureChatBackend {
    /// Build a backend for the endpoint and credential in `config`.
    pub fn from_config(config: &CouncilConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// URL of the chat completions route for one deployment.
    pub fn completions_url(&self, model: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint, model
        )
    }
}

#[async_trait]
impl ChatBackend for AzureChatBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CallFailure> {
        let body = CompletionBody {
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                WireMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url(&request.model))
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CallFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CallFailure::MalformedResponse(e.to_string()))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                CallFailure::MalformedResponse("missing choices[0].message.content".to_string())
            })
    }
}
