//! HTTP gateway.

pub mod error;
pub mod routes;
pub mod types;

pub use error::ApiError;
pub use routes::{AppState, workflow_routes};
pub use types::{WorkflowRequest, WorkflowResponse};
