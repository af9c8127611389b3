//! Deployment check: one short call per seat, no retries.

use coordination::{
    AzureChatBackend, ChatRequest, ConfigError, CouncilConfig, ModelInvoker, ParticipantRole,
    RetryPolicy, RetryingInvoker,
};
use serde::Serialize;
use tracing::{info, warn};

pub const CHECK_MESSAGE: &str = "Say 'Hello' in one word.";
pub const CHECK_MAX_TOKENS: u32 = 10;

/// Result of checking one seat's deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub role: ParticipantRole,
    pub model: String,
    pub result: Result<String, String>,
}

impl CheckOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Single-attempt invoker against the configured endpoint.
pub fn check_invoker(
    config: &CouncilConfig,
) -> Result<RetryingInvoker<AzureChatBackend>, ConfigError> {
    let backend = AzureChatBackend::from_config(config)
        .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
    Ok(RetryingInvoker::new(
        backend,
        RetryPolicy::no_retry(),
        config.timeout,
    ))
}

/// Check member A, member B and the chair, in that order.
pub async fn check_deployments(
    config: &CouncilConfig,
    invoker: &dyn ModelInvoker,
) -> Vec<CheckOutcome> {
    let mut outcomes = Vec::with_capacity(ParticipantRole::ALL.len());
    for role in ParticipantRole::ALL {
        let spec = config.participant(role);
        let request = ChatRequest {
            model: spec.model.clone(),
            system_prompt: spec.system_prompt().to_string(),
            user_message: CHECK_MESSAGE.to_string(),
            temperature: spec.temperature,
            max_tokens: CHECK_MAX_TOKENS,
        };

        let result = match invoker.invoke(&request).await {
            Ok(text) => {
                info!(role = %role, model = %spec.model, "deployment reachable");
                Ok(text.trim().to_string())
            }
            Err(e) => {
                warn!(role = %role, model = %spec.model, error = %e.last_failure(), "deployment check failed");
                Err(e.last_failure().to_string())
            }
        };
        outcomes.push(CheckOutcome {
            role,
            model: spec.model.clone(),
            result,
        });
    }
    outcomes
}

/// Plain-text summary, one line per seat.
pub fn render_outcomes(config: &CouncilConfig, outcomes: &[CheckOutcome]) -> String {
    let mut out = format!(
        "Testing endpoint: {}\nAPI Version: {}\n\n",
        config.endpoint, config.api_version
    );
    for outcome in outcomes {
        match &outcome.result {
            Ok(text) => out.push_str(&format!(
                "[SUCCESS] {} ({}): {}\n",
                outcome.role, outcome.model, text
            )),
            Err(e) => out.push_str(&format!(
                "[FAILED] {} ({}): {}\n",
                outcome.role, outcome.model, e
            )),
        }
    }
    if outcomes.iter().any(|o| !o.is_success()) {
        out.push_str(
            "\nIf a deployment failed with 404, its deployment name might be different.\n\
             Check your Azure AI Foundry portal for the correct deployment names.\n",
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn mount_ok(server: &MockServer, model: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/openai/deployments/{model}/chat/completions")))
            .and(body_partial_json(serde_json::json!({ "max_tokens": 10 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": " Hello \n" } }]
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_reports_each_seat_and_does_not_retry() {
        let server = MockServer::start().await;
        mount_ok(&server, "gpt-4.1").await;
        mount_ok(&server, "DeepSeek-V3.1").await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/grok-3/chat/completions"))
            .respond_with(ResponseTemplate::new(404).set_body_string("DeploymentNotFound"))
            .expect(1)
            .mount(&server)
            .await;

        let config = CouncilConfig::new(server.uri(), "key");
        let invoker = check_invoker(&config).unwrap();
        let outcomes = check_deployments(&config, &invoker).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].result, Ok("Hello".to_string()));
        assert_eq!(outcomes[1].role, ParticipantRole::MemberB);
        assert!(outcomes[1].is_success());
        assert_eq!(outcomes[2].role, ParticipantRole::Chair);
        let err = outcomes[2].result.as_ref().unwrap_err();
        assert!(err.contains("404"));
        assert!(err.contains("DeploymentNotFound"));

        let text = render_outcomes(&config, &outcomes);
        assert!(text.contains("[SUCCESS] member_a (gpt-4.1): Hello"));
        assert!(text.contains("[FAILED] chair (grok-3)"));
        assert!(text.contains("deployment name might be different"));
    }

    #[test]
    fn test_render_all_success_has_no_hint() {
        let config = CouncilConfig::new("https://acct.openai.azure.com", "key");
        let outcomes: Vec<CheckOutcome> = ParticipantRole::ALL
            .iter()
            .map(|role| CheckOutcome {
                role: *role,
                model: config.participant(*role).model.clone(),
                result: Ok("Hello".to_string()),
            })
            .collect();
        let text = render_outcomes(&config, &outcomes);
        assert!(text.starts_with("Testing endpoint: https://acct.openai.azure.com\n"));
        assert!(!text.contains("might be different"));
    }
}
