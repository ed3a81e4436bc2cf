//! Agent runtime integration.
//!
//! The workflow only sees the `AgentRuntime` trait. The production runtime is
//! an OpenAI Responses model reached through rig-core, adapted by
//! `RigAgentRuntime`.

pub mod provider;
mod rig_adapter;

pub use provider::*;
pub use rig_adapter::RigAgentRuntime;

use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::error::LlmError;

/// Configuration for creating the agent runtime.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
}

/// Create the OpenAI-backed agent runtime.
pub fn create_runtime(config: &LlmConfig) -> Result<Arc<dyn AgentRuntime>, LlmError> {
    use rig::providers::openai;

    let client: rig::client::Client<openai::client::OpenAIResponsesExt> =
        openai::Client::new(config.api_key.expose_secret()).map_err(|e| {
            LlmError::RequestFailed {
                provider: "openai".to_string(),
                reason: format!("Failed to create OpenAI client: {}", e),
            }
        })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Using OpenAI (model: {})", config.model);
    Ok(Arc::new(RigAgentRuntime::new(model, &config.model)))
}
