//! Maps gateway failures to response envelopes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use super::types::WorkflowResponse;
use crate::error::WorkflowError;

/// Every failure the gateway can report.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or out-of-bounds request.
    #[error("{0}")]
    Validation(String),

    /// A required credential variable is unset or empty.
    #[error("{0} is not configured")]
    Configuration(String),

    /// The workflow run failed; the cause is logged, not returned.
    #[error("Workflow execution failed")]
    Workflow(#[source] WorkflowError),

    /// Anything unclassified, including handler panics.
    #[error("Internal server error occurred")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Workflow(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        Self::Workflow(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(reason) => warn!(reason = %reason, "Rejected invalid request"),
            Self::Configuration(var) => warn!(var = %var, "Required credential is not configured"),
            Self::Workflow(e) => error!(error = %e, "Workflow execution failed"),
            Self::Internal(detail) => error!(detail = %detail, "Unhandled fault"),
        }
        let body = Json(WorkflowResponse::failure(self.to_string()));
        (self.status(), body).into_response()
    }
}
