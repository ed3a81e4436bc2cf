//! Configuration types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default instructions: read the input as an email body and draft a reply to it.
pub const DEFAULT_AGENT_INSTRUCTIONS: &str = "入力をメールの文章と理解して，返信文章を作成して";

/// Default agent name.
pub const DEFAULT_AGENT_NAME: &str = "My agent";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Reasoning effort requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasoningEffort {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ConfigError::InvalidValue {
                key: "WORKFLOW_REASONING_EFFORT".to_string(),
                message: format!("expected minimal|low|medium|high, got '{}'", other),
            }),
        }
    }
}

/// How much of the model's reasoning summary to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningSummary {
    Auto,
    Concise,
    Detailed,
}

/// Reasoning settings sent with each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningSettings {
    pub effort: ReasoningEffort,
    pub summary: ReasoningSummary,
}

/// Provider-side model settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Ask the provider to store the response.
    pub store: bool,
    pub reasoning: ReasoningSettings,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            store: true,
            reasoning: ReasoningSettings {
                effort: ReasoningEffort::Low,
                summary: ReasoningSummary::Auto,
            },
        }
    }
}

/// Fixed definition of the agent the workflow talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDefinition {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub model_settings: ModelSettings,
}

impl Default for AgentDefinition {
    fn default() -> Self {
        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
            instructions: DEFAULT_AGENT_INSTRUCTIONS.to_string(),
            model: DEFAULT_MODEL.to_string(),
            model_settings: ModelSettings::default(),
        }
    }
}

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Name of the environment variable checked by `/health`.
    pub api_key_env: String,
    pub agent: AgentDefinition,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            api_key_env: API_KEY_ENV.to_string(),
            agent: AgentDefinition::default(),
        }
    }
}

impl ServiceConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{}' is not a valid port number", port),
            })?;
        }

        if let Some(model) = lookup("WORKFLOW_MODEL").filter(|v| !v.trim().is_empty()) {
            config.agent.model = model.trim().to_string();
        }

        if let Some(effort) = lookup("WORKFLOW_REASONING_EFFORT").filter(|v| !v.trim().is_empty()) {
            config.agent.model_settings.reasoning.effort = effort.parse()?;
        }

        Ok(config)
    }

    /// Read the provider credential, failing if it is unset or empty.
    pub fn api_key(&self) -> Result<secrecy::SecretString, ConfigError> {
        read_api_key(&self.api_key_env)
    }
}

/// Whether the named credential variable is set to a non-empty value.
pub fn api_key_configured(var: &str) -> bool {
    std::env::var(var).is_ok_and(|v| !v.is_empty())
}

fn read_api_key(var: &str) -> Result<secrecy::SecretString, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => Ok(secrecy::SecretString::from(v)),
        _ => Err(ConfigError::MissingEnvVar(var.to_string())),
    }
}
