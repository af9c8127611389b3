//! Council settings: TOML file, environment (with `.env`), and CLI flags.
//!
//! Every field is optional so sources can be layered. Higher layers win:
//! CLI flags, then environment variables, then the TOML file, then the
//! built-in defaults of [`CouncilConfig`].

use std::path::Path;
use std::time::Duration;

use coordination::{ConfigError, CouncilConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_ENDPOINT: &str = "AZURE_AI_PROJECT_ENDPOINT";
pub const ENV_API_KEY: &str = "AZURE_AI_API_KEY";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_MODEL_MEMBER_A: &str = "MODEL_DEPLOYMENT_GPT41";
pub const ENV_MODEL_MEMBER_B: &str = "MODEL_DEPLOYMENT_DEEPSEEK";
pub const ENV_MODEL_CHAIR: &str = "MODEL_DEPLOYMENT_GROK";
pub const ENV_TEMPERATURE_MEMBERS: &str = "TEMPERATURE_COUNCIL_MEMBERS";
pub const ENV_TEMPERATURE_CHAIR: &str = "TEMPERATURE_CHAIR";
pub const ENV_TIMEOUT: &str = "AGENT_TIMEOUT";
pub const ENV_MAX_TOKENS: &str = "COUNCIL_MAX_TOKENS";
pub const ENV_DEBATE_DEADLINE: &str = "COUNCIL_DEBATE_DEADLINE";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("missing required settings: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Partially specified council settings from one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CouncilSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub api_version: Option<String>,
    pub member_a_model: Option<String>,
    pub member_b_model: Option<String>,
    pub chair_model: Option<String>,
    pub member_a_name: Option<String>,
    pub member_b_name: Option<String>,
    pub member_temperature: Option<f32>,
    pub chair_temperature: Option<f32>,
    /// Per-attempt call timeout, seconds.
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
    pub max_attempts: Option<u32>,
    /// Bound on the whole debate, seconds.
    pub debate_deadline_secs: Option<u64>,
}

impl CouncilSettings {
    /// Parse a TOML settings file.
    pub fn from_toml_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Read settings through `lookup`, keyed by environment variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Ok(Self {
            endpoint: text(ENV_ENDPOINT),
            api_key: text(ENV_API_KEY),
            api_version: text(ENV_API_VERSION),
            member_a_model: text(ENV_MODEL_MEMBER_A),
            member_b_model: text(ENV_MODEL_MEMBER_B),
            chair_model: text(ENV_MODEL_CHAIR),
            member_a_name: None,
            member_b_name: None,
            member_temperature: parse(ENV_TEMPERATURE_MEMBERS, text(ENV_TEMPERATURE_MEMBERS))?,
            chair_temperature: parse(ENV_TEMPERATURE_CHAIR, text(ENV_TEMPERATURE_CHAIR))?,
            timeout_secs: parse(ENV_TIMEOUT, text(ENV_TIMEOUT))?,
            max_tokens: parse(ENV_MAX_TOKENS, text(ENV_MAX_TOKENS))?,
            max_attempts: None,
            debate_deadline_secs: parse(ENV_DEBATE_DEADLINE, text(ENV_DEBATE_DEADLINE))?,
        })
    }

    /// Settings from the process environment. Loads `.env` first; variables
    /// already set in the environment are not overwritten by it.
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Optional TOML file overlaid with the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self, SettingsError> {
        let base = match config_path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.overlay(Self::from_env()?))
    }

    /// Fields set in `over` replace those in `self`.
    pub fn overlay(self, over: Self) -> Self {
        Self {
            endpoint: over.endpoint.or(self.endpoint),
            api_key: over.api_key.or(self.api_key),
            api_version: over.api_version.or(self.api_version),
            member_a_model: over.member_a_model.or(self.member_a_model),
            member_b_model: over.member_b_model.or(self.member_b_model),
            chair_model: over.chair_model.or(self.chair_model),
            member_a_name: over.member_a_name.or(self.member_a_name),
            member_b_name: over.member_b_name.or(self.member_b_name),
            member_temperature: over.member_temperature.or(self.member_temperature),
            chair_temperature: over.chair_temperature.or(self.chair_temperature),
            timeout_secs: over.timeout_secs.or(self.timeout_secs),
            max_tokens: over.max_tokens.or(self.max_tokens),
            max_attempts: over.max_attempts.or(self.max_attempts),
            debate_deadline_secs: over.debate_deadline_secs.or(self.debate_deadline_secs),
        }
    }

    /// Resolve into a validated [`CouncilConfig`].
    pub fn into_config(self) -> Result<CouncilConfig, SettingsError> {
        let mut missing = Vec::new();
        if self.endpoint.is_none() {
            missing.push(ENV_ENDPOINT);
        }
        if self.api_key.is_none() {
            missing.push(ENV_API_KEY);
        }
        let (Some(endpoint), Some(api_key)) = (self.endpoint, self.api_key) else {
            return Err(SettingsError::Missing(missing));
        };

        let mut config = CouncilConfig::new(endpoint, api_key);
        if let Some(version) = self.api_version {
            config.api_version = version;
        }
        if let Some(model) = self.member_a_model {
            config.member_a.model = model;
        }
        if let Some(model) = self.member_b_model {
            config.member_b.model = model;
        }
        if let Some(model) = self.chair_model {
            config.chair.model = model;
        }
        if let Some(name) = self.member_a_name {
            config.member_a.display_name = name;
        }
        if let Some(name) = self.member_b_name {
            config.member_b.display_name = name;
        }
        if let Some(t) = self.member_temperature {
            config.member_a.temperature = t;
            config.member_b.temperature = t;
        }
        if let Some(t) = self.chair_temperature {
            config.chair.temperature = t;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(attempts) = self.max_attempts {
            config.retry.max_attempts = attempts;
        }
        config.debate_deadline = self.debate_deadline_secs.map(Duration::from_secs);

        config.validate()?;
        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, SettingsError> {
    raw.map(|value| {
        value
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidValue { key, value })
    })
    .transpose()
}
