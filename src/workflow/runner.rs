//! Single-turn, approval-gated agent invocation.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};

use super::approval::{ApprovalGate, ApprovalRequest, AutoApprove};
use super::types::{
    ConversationHistory, WorkflowInput, WorkflowOutput, WorkflowResult, WorkflowState,
};
use crate::config::AgentDefinition;
use crate::error::{LlmError, WorkflowError};
use crate::llm::{AgentRuntime, RunConfig};

/// Trace name attached to every run.
pub const WORKFLOW_NAME: &str = "test workflow";

/// Value of the `__trace_source__` trace metadata key.
pub const TRACE_SOURCE: &str = "agent-builder";

/// Identifier of the published workflow, sent as trace metadata.
pub const WORKFLOW_ID: &str = "wf_6902c65510d48190b00cc15ada9afdb201102001bbe3ff0a";

/// Run configuration used unless the caller supplies one.
pub fn default_run_config() -> RunConfig {
    RunConfig::new(WORKFLOW_NAME)
        .with_metadata("__trace_source__", TRACE_SOURCE)
        .with_metadata("workflow_id", WORKFLOW_ID)
}

/// Runs the email reply workflow against an agent runtime.
pub struct WorkflowRunner {
    agent: AgentDefinition,
    runtime: Arc<dyn AgentRuntime>,
    approval: Arc<dyn ApprovalGate>,
    run_config: RunConfig,
}

impl WorkflowRunner {
    /// Create a runner that approves every request.
    pub fn new(agent: AgentDefinition, runtime: Arc<dyn AgentRuntime>) -> Self {
        Self {
            agent,
            runtime,
            approval: Arc::new(AutoApprove),
            run_config: default_run_config(),
        }
    }

    pub fn with_approval_gate(mut self, gate: Arc<dyn ApprovalGate>) -> Self {
        self.approval = gate;
        self
    }

    pub fn with_run_config(mut self, run_config: RunConfig) -> Self {
        self.run_config = run_config;
        self
    }

    /// Run the workflow and return its result.
    pub async fn run(&self, input: &WorkflowInput) -> Result<WorkflowResult, WorkflowError> {
        self.run_with_history(input).await.map(|(result, _)| result)
    }

    /// Run the workflow and also return the final conversation history.
    ///
    /// On approval the history holds the user turn followed by every item the
    /// agent produced. On rejection it holds only the user turn.
    pub async fn run_with_history(
        &self,
        input: &WorkflowInput,
    ) -> Result<(WorkflowResult, ConversationHistory), WorkflowError> {
        let span = info_span!("workflow", name = %self.run_config.workflow_name);
        self.execute(input).instrument(span).await
    }

    async fn execute(
        &self,
        input: &WorkflowInput,
    ) -> Result<(WorkflowResult, ConversationHistory), WorkflowError> {
        let mut state = WorkflowState::PendingApproval;
        let mut history = ConversationHistory::from_input(input);

        // Always empty for now; see ApprovalGate.
        let approval = ApprovalRequest::default();

        if !self.approval.approve(&approval).await {
            transition(&mut state, WorkflowState::Rejected);
            warn!("Workflow approval was rejected");
            return Ok((WorkflowResult::Rejected, history));
        }

        transition(&mut state, WorkflowState::InvokingAgent);
        info!(
            agent = %self.agent.name,
            model = %self.agent.model,
            workflow = %self.run_config.workflow_name,
            "Invoking agent"
        );

        let run = match self
            .runtime
            .run(&self.agent, history.items(), &self.run_config)
            .await
        {
            Ok(run) => run,
            Err(e) => {
                transition(&mut state, WorkflowState::Failed);
                return Err(e.into());
            }
        };

        let output_text = run.final_output_text();
        history.extend(run.new_items);

        let Some(output_text) = output_text else {
            transition(&mut state, WorkflowState::Failed);
            return Err(LlmError::InvalidResponse {
                provider: self.runtime.provider_name().to_string(),
                reason: "agent produced no text output".to_string(),
            }
            .into());
        };

        transition(&mut state, WorkflowState::Completed);
        Ok((
            WorkflowResult::Completed(WorkflowOutput { output_text }),
            history,
        ))
    }
}

fn transition(state: &mut WorkflowState, next: WorkflowState) {
    debug_assert!(!state.is_terminal(), "workflow already finished as {}", state);
    debug_assert!(
        state.can_transition_to(next),
        "illegal workflow transition {} -> {}",
        state,
        next
    );
    debug!(from = %state, to = %next, "Workflow state transition");
    *state = next;
}
