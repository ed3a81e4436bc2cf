//! Email reply workflow: approval gate, then one agent turn.

pub mod approval;
pub mod runner;
pub mod types;

pub use approval::{AlwaysReject, ApprovalGate, ApprovalRequest, AutoApprove, PredicateGate};
pub use runner::{WorkflowRunner, default_run_config};
pub use types::{
    ConversationHistory, WorkflowInput, WorkflowOutput, WorkflowResult, WorkflowState,
};
