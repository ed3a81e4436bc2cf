//! Workflow data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::llm::ConversationItem;

/// Input to a single workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowInput {
    /// Raw email text.
    pub input_as_text: String,
}

impl WorkflowInput {
    pub fn new(input_as_text: impl Into<String>) -> Self {
        Self {
            input_as_text: input_as_text.into(),
        }
    }
}

/// Ordered conversation history for one request.
///
/// Starts with exactly one user turn built from the workflow input; the
/// agent's items are appended after the run, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    items: Vec<ConversationItem>,
}

impl ConversationHistory {
    /// History holding a single user turn with the input text.
    pub fn from_input(input: &WorkflowInput) -> Self {
        Self {
            items: vec![ConversationItem::user_text(input.input_as_text.clone())],
        }
    }

    pub fn items(&self) -> &[ConversationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append items produced by the agent.
    pub fn extend(&mut self, items: impl IntoIterator<Item = ConversationItem>) {
        self.items.extend(items);
    }
}

/// Text extracted from a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOutput {
    pub output_text: String,
}

/// Outcome of a workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowResult {
    Completed(WorkflowOutput),
    /// The approval gate declined; the agent was not called.
    Rejected,
}

impl WorkflowResult {
    pub fn output_text(&self) -> Option<&str> {
        match self {
            Self::Completed(output) => Some(&output.output_text),
            Self::Rejected => None,
        }
    }
}

/// Lifecycle of one workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    PendingApproval,
    Rejected,
    InvokingAgent,
    Completed,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(&self, next: WorkflowState) -> bool {
        matches!(
            (self, next),
            (Self::PendingApproval, Self::Rejected)
                | (Self::PendingApproval, Self::InvokingAgent)
                | (Self::InvokingAgent, Self::Completed)
                | (Self::InvokingAgent, Self::Failed)
        )
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PendingApproval => "pending_approval",
            Self::Rejected => "rejected",
            Self::InvokingAgent => "invoking_agent",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}
