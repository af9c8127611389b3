//! Council participants and their configuration.
//!
//! The council has exactly three seats: two debating members and a chair.
//! Each seat is bound to one model deployment with its own temperature and
//! display name. A [`CouncilConfig`] is built once at process start,
//! validated, and then handed to the orchestrator by value.

pub mod backend;
pub mod invoker;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::debate::prompts;
use crate::resilience::RetryPolicy;

pub use backend::{AzureChatBackend, CallFailure, ChatBackend, ChatRequest};
pub use invoker::{InvokeError, ModelInvoker, RetryingInvoker};

/// Default Azure OpenAI REST API version.
pub const DEFAULT_API_VERSION: &str = "2024-10-21";
/// Default per-attempt timeout for a model call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default completion budget per call.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Errors detected while validating council configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("model endpoint is not configured")]
    MissingEndpoint,

    #[error("API key is not configured")]
    MissingApiKey,

    #[error("model deployment for {0} is empty")]
    MissingModel(ParticipantRole),

    #[error("call timeout must be positive")]
    InvalidTimeout,

    #[error("debate deadline must be positive")]
    InvalidDeadline,

    #[error("temperature {value} for {role} is outside [0, 2]")]
    InvalidTemperature { role: ParticipantRole, value: f32 },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Seat of a council participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    /// Analytical member; opens the round-2 critique.
    MemberA,
    /// Critical member; answers member A in round 2.
    MemberB,
    /// Synthesises the transcript into the verdict.
    Chair,
}

impl ParticipantRole {
    pub const ALL: [ParticipantRole; 3] = [Self::MemberA, Self::MemberB, Self::Chair];

    /// The fixed system prompt for this seat.
    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::MemberA => prompts::member_a_system_prompt(),
            Self::MemberB => prompts::member_b_system_prompt(),
            Self::Chair => prompts::chair_system_prompt(),
        }
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemberA => write!(f, "member_a"),
            Self::MemberB => write!(f, "member_b"),
            Self::Chair => write!(f, "chair"),
        }
    }
}

/// One configured council seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub role: ParticipantRole,
    /// Deployment name sent to the endpoint; opaque to the orchestrator.
    pub model: String,
    pub temperature: f32,
    /// Member section header in the rendered debate. The chair's header
    /// names its model instead.
    pub display_name: String,
}

impl ParticipantSpec {
    pub fn new(
        role: ParticipantRole,
        model: impl Into<String>,
        temperature: f32,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            role,
            model: model.into(),
            temperature,
            display_name: display_name.into(),
        }
    }

    /// Stock seat assignment: GPT-4.1, DeepSeek-V3.1 and Grok-3.
    pub fn default_for(role: ParticipantRole) -> Self {
        match role {
            ParticipantRole::MemberA => Self::new(
                role,
                "gpt-4.1",
                0.7,
                "Council Member A (Analytical - GPT-4.1)",
            ),
            ParticipantRole::MemberB => Self::new(
                role,
                "DeepSeek-V3.1",
                0.7,
                "Council Member B (Critical - DeepSeek-V3.1)",
            ),
            ParticipantRole::Chair => Self::new(role, "grok-3", 0.3, "Chair"),
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        self.role.system_prompt()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingModel(self.role));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature {
                role: self.role,
                value: self.temperature,
            });
        }
        Ok(())
    }
}

/// Fully resolved configuration for one council.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilConfig {
    /// Base URL of the model endpoint (normalised, no trailing slash).
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub member_a: ParticipantSpec,
    pub member_b: ParticipantSpec,
    pub chair: ParticipantSpec,
    /// Per-attempt timeout of a model call.
    pub timeout: Duration,
    pub max_tokens: u32,
    pub retry: RetryPolicy,
    /// Optional bound on the whole three-round debate.
    pub debate_deadline: Option<Duration>,
}

impl CouncilConfig {
    /// Config with the stock seats and defaults for everything else.
    pub fn new(endpoint: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint.as_ref()),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            member_a: ParticipantSpec::default_for(ParticipantRole::MemberA),
            member_b: ParticipantSpec::default_for(ParticipantRole::MemberB),
            chair: ParticipantSpec::default_for(ParticipantRole::Chair),
            timeout: DEFAULT_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
            retry: RetryPolicy::default(),
            debate_deadline: None,
        }
    }

    pub fn participant(&self, role: ParticipantRole) -> &ParticipantSpec {
        match role {
            ParticipantRole::MemberA => &self.member_a,
            ParticipantRole::MemberB => &self.member_b,
            ParticipantRole::Chair => &self.chair,
        }
    }

    /// Check everything a debate needs before any call is made.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        for role in ParticipantRole::ALL {
            self.participant(role).validate()?;
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.debate_deadline.is_some_and(|d| d.is_zero()) {
            return Err(ConfigError::InvalidDeadline);
        }
        Ok(())
    }
}

/// Trim trailing slashes and map Cognitive Services hosts onto the
/// OpenAI-compatible host that serves the deployments API.
pub fn normalize_endpoint(raw: &str) -> String {
    raw.trim()
        .trim_end_matches('/')
        .replace("cognitiveservices.azure.com", "openai.azure.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_role_display() {
        assert_eq!(ParticipantRole::MemberA.to_string(), "member_a");
        assert_eq!(ParticipantRole::MemberB.to_string(), "member_b");
        assert_eq!(ParticipantRole::Chair.to_string(), "chair");
    }

    #[test]
    fn test_default_seats() {
        let config = CouncilConfig::new("https://example.openai.azure.com/", "key");
        assert_eq!(config.endpoint, "https://example.openai.azure.com");
        assert_eq!(config.member_a.model, "gpt-4.1");
        assert_eq!(config.member_b.model, "DeepSeek-V3.1");
        assert_eq!(config.chair.model, "grok-3");
        assert_eq!(config.chair.temperature, 0.3);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.debate_deadline.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_key() {
        let config = CouncilConfig::new("https://example.openai.azure.com", "  ");
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn test_validate_missing_endpoint() {
        let config = CouncilConfig::new("", "key");
        assert_eq!(config.validate(), Err(ConfigError::MissingEndpoint));
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = CouncilConfig::new("https://e", "key");
        config.member_b.model = String::new();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingModel(ParticipantRole::MemberB))
        );
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = CouncilConfig::new("https://e", "key");
        config.chair.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chair"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = CouncilConfig::new("https://e", "key");
        config.timeout = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeout));
    }

    #[test]
    fn test_validate_zero_deadline() {
        let mut config = CouncilConfig::new("https://e", "key");
        config.debate_deadline = Some(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::InvalidDeadline));

        config.debate_deadline = Some(Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_normalize_cognitive_services_host() {
        assert_eq!(
            normalize_endpoint(" https://acct.cognitiveservices.azure.com// "),
            "https://acct.openai.azure.com"
        );
    }

    #[test]
    fn test_system_prompt_by_role() {
        assert!(ParticipantRole::MemberA
            .system_prompt()
            .starts_with("You are Council Member A"));
        assert!(ParticipantRole::Chair
            .system_prompt()
            .contains("## The Verdict"));
    }
}
