//! Approval gate consulted before the agent is invoked.

use async_trait::async_trait;

/// Message handed to the approval gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalRequest {
    pub message: String,
}

impl ApprovalRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Decides whether a workflow run may call the agent.
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    async fn approve(&self, request: &ApprovalRequest) -> bool;
}

/// Approves every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl ApprovalGate for AutoApprove {
    async fn approve(&self, _request: &ApprovalRequest) -> bool {
        true
    }
}

/// Rejects every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReject;

#[async_trait]
impl ApprovalGate for AlwaysReject {
    async fn approve(&self, _request: &ApprovalRequest) -> bool {
        false
    }
}

/// Adapts a plain predicate over the request.
pub struct PredicateGate<F> {
    predicate: F,
}

impl<F> PredicateGate<F>
where
    F: Fn(&ApprovalRequest) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

#[async_trait]
impl<F> ApprovalGate for PredicateGate<F>
where
    F: Fn(&ApprovalRequest) -> bool + Send + Sync,
{
    async fn approve(&self, request: &ApprovalRequest) -> bool {
        (self.predicate)(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn auto_approve_accepts_empty_message() {
        assert!(AutoApprove.approve(&ApprovalRequest::default()).await);
    }

    #[tokio::test]
    async fn always_reject_declines() {
        assert!(!AlwaysReject.approve(&ApprovalRequest::new("ok?")).await);
    }

    #[tokio::test]
    async fn predicate_gate_sees_message() {
        let gate = PredicateGate::new(|req: &ApprovalRequest| req.message == "yes");
        assert!(gate.approve(&ApprovalRequest::new("yes")).await);
        assert!(!gate.approve(&ApprovalRequest::new("")).await);
    }
}
