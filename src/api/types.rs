//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "Email Reply Workflow API";

/// Minimum accepted `input_text` length, in characters.
pub const MIN_INPUT_CHARS: usize = 1;

/// Maximum accepted `input_text` length, in characters.
pub const MAX_INPUT_CHARS: usize = 10_000;

/// Body of `POST /workflow`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRequest {
    /// Email text to reply to.
    pub input_text: String,
}

/// Envelope returned by `POST /workflow` and by every error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowResponse {
    pub fn success(output_text: impl Into<String>) -> Self {
        Self {
            success: true,
            output_text: Some(output_text.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output_text: None,
            error: Some(error.into()),
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub version: String,
}

/// Body of a healthy `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub api_key_configured: bool,
}
