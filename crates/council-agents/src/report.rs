//! User-facing failure report.

use std::fmt::Display;

use coordination::CouncilConfig;
use serde::Serialize;

/// Shown when the query is empty.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question or topic for the council to debate.";

/// Non-secret summary of the active configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigStatus {
    pub endpoint: String,
    pub member_a_model: String,
    pub member_b_model: String,
    pub chair_model: String,
}

impl ConfigStatus {
    pub fn from_config(config: &CouncilConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            member_a_model: config.member_a.model.clone(),
            member_b_model: config.member_b.model.clone(),
            chair_model: config.chair.model.clone(),
        }
    }
}

/// Render an error with troubleshooting steps and, when known, the
/// configuration it ran under.
pub fn failure_report(error: &dyn Display, status: Option<&ConfigStatus>) -> String {
    let mut out = format!(
        "Error: {error}\n\
         \n\
         **Troubleshooting Steps:**\n\
         1. Check your Azure configuration in `.env` file\n\
         2. Verify the endpoint is reachable and the API key is valid\n\
         3. Verify your model deployment names in Azure AI Foundry portal\n\
         4. Check Azure service health and quotas\n"
    );

    if let Some(status) = status {
        out.push_str(&format!(
            "\n\
             **Configuration Status:**\n\
             - Endpoint: {}\n\
             - Member A Model: {}\n\
             - Member B Model: {}\n\
             - Chair Model: {}\n\
             - Authentication: API Key\n",
            status.endpoint,
            status.member_a_model,
            status.member_b_model,
            status.chair_model,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_models_without_key() {
        let config = CouncilConfig::new("https://acct.openai.azure.com", "super-secret-key");
        let status = ConfigStatus::from_config(&config);
        let report = failure_report(&"debate failed at round2/member_b: boom", Some(&status));

        assert!(report.starts_with("Error: debate failed at round2/member_b: boom\n"));
        assert!(report.contains("**Troubleshooting Steps:**"));
        assert!(report.contains("- Endpoint: https://acct.openai.azure.com"));
        assert!(report.contains("- Member B Model: DeepSeek-V3.1"));
        assert!(report.contains("- Chair Model: grok-3"));
        assert!(report.contains("- Authentication: API Key"));
        assert!(!report.contains("super-secret-key"));
    }

    #[test]
    fn test_report_without_config_omits_status_block() {
        let report = failure_report(&"missing required settings: AZURE_AI_API_KEY", None);
        assert!(report.contains("Troubleshooting"));
        assert!(!report.contains("Configuration Status"));
    }
}
