//! Bridges rig's `CompletionModel` to our `AgentRuntime` trait.

use async_trait::async_trait;
use rig::completion::message::AssistantContent;
use rig::completion::{CompletionError, CompletionModel, Message};
use rig::http_client;
use tracing::{Instrument, debug, info_span, warn};

use crate::config::{AgentDefinition, ModelSettings};
use crate::error::LlmError;
use crate::llm::provider::{AgentRuntime, ConversationItem, Role, RunConfig, RunResult};

const PROVIDER: &str = "openai";

/// Agent runtime backed by a rig completion model.
pub struct RigAgentRuntime<M> {
    model: M,
    model_name: String,
}

impl<M> RigAgentRuntime<M>
where
    M: CompletionModel,
{
    pub fn new(model: M, model_name: &str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
        }
    }
}

#[async_trait]
impl<M> AgentRuntime for RigAgentRuntime<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    async fn run(
        &self,
        agent: &AgentDefinition,
        input: &[ConversationItem],
        config: &RunConfig,
    ) -> Result<RunResult, LlmError> {
        let span = info_span!(
            "agent_run",
            workflow = %config.workflow_name,
            agent = %agent.name,
            model = %self.model_name,
            trace_metadata = ?config.trace_metadata,
        );

        async move {
            if agent.model != self.model_name {
                warn!(
                    requested = %agent.model,
                    "Agent definition names a different model than the client was built for"
                );
            }

            let mut messages: Vec<Message> = input.iter().filter_map(to_rig_message).collect();
            let prompt = messages.pop().ok_or_else(|| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: "conversation history has no message to send".to_string(),
            })?;

            let response = self
                .model
                .completion_request(prompt)
                .preamble(agent.instructions.clone())
                .messages(messages)
                .additional_params(additional_params(&agent.model_settings))
                .send()
                .await
                .map_err(map_completion_error)?;

            let new_items: Vec<ConversationItem> =
                response.choice.iter().filter_map(item_from_content).collect();
            debug!(items = new_items.len(), "Agent run completed");

            Ok(RunResult::new(new_items))
        }
        .instrument(span)
        .await
    }
}

/// Provider parameters rig passes through untouched.
fn additional_params(settings: &ModelSettings) -> serde_json::Value {
    serde_json::json!({
        "store": settings.store,
        "reasoning": {
            "effort": settings.reasoning.effort,
            "summary": settings.reasoning.summary,
        },
    })
}

fn to_rig_message(item: &ConversationItem) -> Option<Message> {
    let text = item.text()?;
    match item.role()? {
        Role::User => Some(Message::user(text)),
        Role::Assistant => Some(Message::assistant(text)),
    }
}

fn item_from_content(content: &AssistantContent) -> Option<ConversationItem> {
    match content {
        AssistantContent::Text(text) => Some(ConversationItem::assistant_text(text.text.clone())),
        AssistantContent::ToolCall(call) => Some(ConversationItem::ToolCall {
            name: call.function.name.clone(),
            arguments: call.function.arguments.clone(),
        }),
        AssistantContent::Reasoning(_) => Some(ConversationItem::Reasoning),
        #[allow(unreachable_patterns)]
        other => {
            debug!(?other, "Skipping unsupported assistant content");
            None
        }
    }
}

fn map_completion_error(e: CompletionError) -> LlmError {
    let provider = PROVIDER.to_string();
    match e {
        CompletionError::HttpError(
            http_client::Error::InvalidStatusCode(status)
            | http_client::Error::InvalidStatusCodeWithMessage(status, _),
        ) if matches!(status.as_u16(), 401 | 403) => LlmError::AuthFailed { provider },
        CompletionError::ResponseError(_) | CompletionError::JsonError(_) => {
            LlmError::InvalidResponse {
                provider,
                reason: e.to_string(),
            }
        }
        other => LlmError::RequestFailed {
            provider,
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReasoningEffort;

    #[test]
    fn additional_params_carry_reasoning_and_store() {
        let mut settings = ModelSettings::default();
        settings.reasoning.effort = ReasoningEffort::Medium;
        let params = additional_params(&settings);
        assert_eq!(params["store"], true);
        assert_eq!(params["reasoning"]["effort"], "medium");
        assert_eq!(params["reasoning"]["summary"], "auto");
    }

    #[test]
    fn history_items_map_to_rig_messages() {
        assert_eq!(
            to_rig_message(&ConversationItem::user_text("hi")),
            Some(Message::user("hi"))
        );
        assert_eq!(
            to_rig_message(&ConversationItem::assistant_text("hello")),
            Some(Message::assistant("hello"))
        );
        assert_eq!(to_rig_message(&ConversationItem::Reasoning), None);
    }

    #[test]
    fn text_content_becomes_assistant_item() {
        let item = item_from_content(&AssistantContent::text("承知いたしました。")).unwrap();
        assert_eq!(item.role(), Some(Role::Assistant));
        assert_eq!(item.text().as_deref(), Some("承知いたしました。"));
    }

    #[test]
    fn provider_text_mentioning_401_is_not_an_auth_failure() {
        let err = map_completion_error(CompletionError::ProviderError(
            "rate limit for org_401 exceeded".into(),
        ));
        match err {
            LlmError::RequestFailed { reason, .. } => assert!(reason.contains("org_401")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_responses_are_invalid_response() {
        assert!(matches!(
            map_completion_error(CompletionError::ResponseError("no output".into())),
            LlmError::InvalidResponse { .. }
        ));
    }
}
