//! REST endpoints for the email reply workflow.

use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::error::ApiError;
use super::types::{
    HealthResponse, MAX_INPUT_CHARS, MIN_INPUT_CHARS, SERVICE_NAME, ServiceInfo, WorkflowRequest,
    WorkflowResponse,
};
use crate::config;
use crate::workflow::{WorkflowInput, WorkflowResult, WorkflowRunner};

/// Shared state for the workflow routes.
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<WorkflowRunner>,
    /// Credential variable checked by `/health`.
    pub api_key_env: String,
}

impl AppState {
    pub fn new(runner: Arc<WorkflowRunner>, api_key_env: impl Into<String>) -> Self {
        Self {
            runner,
            api_key_env: api_key_env.into(),
        }
    }
}

/// Build the router: `/`, `/health` and `/workflow`.
pub fn workflow_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/workflow", post(execute_workflow))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

/// GET /
async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health
///
/// Reads the credential variable on every call.
async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if !config::api_key_configured(&state.api_key_env) {
        return Err(ApiError::Configuration(state.api_key_env.clone()));
    }
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        api_key_configured: true,
    }))
}

// ── Workflow ────────────────────────────────────────────────────────────

/// POST /workflow
async fn execute_workflow(
    State(state): State<AppState>,
    payload: Result<Json<WorkflowRequest>, JsonRejection>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let input_length = validate_input_text(&request.input_text)?;

    let request_id = Uuid::new_v4();
    let span = info_span!("workflow_request", %request_id, input_length);

    run_workflow(&state, request, input_length)
        .instrument(span)
        .await
}

async fn run_workflow(
    state: &AppState,
    request: WorkflowRequest,
    input_length: usize,
) -> Result<Json<WorkflowResponse>, ApiError> {
    info!(input_length, "Received workflow request");

    let input = WorkflowInput::new(request.input_text);
    match state.runner.run(&input).await? {
        WorkflowResult::Rejected => {
            warn!("Workflow returned no result (approval rejected)");
            Ok(Json(WorkflowResponse::failure(
                "Workflow approval was rejected",
            )))
        }
        WorkflowResult::Completed(output) => {
            info!("Workflow completed successfully");
            Ok(Json(WorkflowResponse::success(output.output_text)))
        }
    }
}

/// Check the input length in characters and return it.
fn validate_input_text(text: &str) -> Result<usize, ApiError> {
    let length = text.chars().count();
    if length < MIN_INPUT_CHARS {
        return Err(ApiError::Validation(
            "input_text must not be empty".to_string(),
        ));
    }
    if length > MAX_INPUT_CHARS {
        return Err(ApiError::Validation(format!(
            "input_text must be at most {} characters, got {}",
            MAX_INPUT_CHARS, length
        )));
    }
    Ok(length)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(detail).into_response()
}
