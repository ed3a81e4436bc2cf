//! Agent runtime trait and the conversation types that cross it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AgentDefinition;
use crate::error::LlmError;

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A typed content block inside a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text supplied by the user.
    InputText { text: String },
    /// Text produced by the agent.
    OutputText { text: String },
}

impl ContentBlock {
    pub fn text(&self) -> &str {
        match self {
            Self::InputText { text } | Self::OutputText { text } => text,
        }
    }
}

/// One entry in a conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationItem {
    Message {
        role: Role,
        content: Vec<ContentBlock>,
    },
    /// The model reasoned before answering; the trace itself is not kept.
    Reasoning,
    ToolCall {
        name: String,
        arguments: serde_json::Value,
    },
}

impl ConversationItem {
    /// A user message with a single text block.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::Message {
            role: Role::User,
            content: vec![ContentBlock::InputText { text: text.into() }],
        }
    }

    /// An assistant message with a single text block.
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::Message {
            role: Role::Assistant,
            content: vec![ContentBlock::OutputText { text: text.into() }],
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Message { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// Concatenated text of a message item, `None` for other items.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Message { content, .. } => {
                Some(content.iter().map(ContentBlock::text).collect::<String>())
            }
            _ => None,
        }
    }
}

/// Per-run configuration: the trace name and metadata attached to the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub workflow_name: String,
    pub trace_metadata: BTreeMap<String, String>,
}

impl RunConfig {
    pub fn new(workflow_name: impl Into<String>) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            trace_metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.trace_metadata.insert(key.into(), value.into());
        self
    }
}

/// Completion of a single agent run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunResult {
    /// Items produced by the agent, in emission order.
    pub new_items: Vec<ConversationItem>,
}

impl RunResult {
    pub fn new(new_items: Vec<ConversationItem>) -> Self {
        Self { new_items }
    }

    /// Text of the last assistant message, if the agent produced one.
    pub fn final_output_text(&self) -> Option<String> {
        self.new_items
            .iter()
            .rev()
            .find(|item| item.role() == Some(Role::Assistant))
            .and_then(ConversationItem::text)
    }
}

/// An external conversational agent runtime.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Provider name used in logs and errors.
    fn provider_name(&self) -> &str;

    /// Run one turn of `agent` over `input` and return everything it produced.
    async fn run(
        &self,
        agent: &AgentDefinition,
        input: &[ConversationItem],
        config: &RunConfig,
    ) -> Result<RunResult, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_item_serializes_as_input_text() {
        let item = ConversationItem::user_text("hello");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "message",
                "role": "user",
                "content": [{"type": "input_text", "text": "hello"}]
            })
        );
    }

    #[test]
    fn final_output_is_last_assistant_message() {
        let result = RunResult::new(vec![
            ConversationItem::Reasoning,
            ConversationItem::assistant_text("draft"),
            ConversationItem::ToolCall {
                name: "lookup".into(),
                arguments: serde_json::json!({}),
            },
            ConversationItem::assistant_text("final"),
        ]);
        assert_eq!(result.final_output_text().as_deref(), Some("final"));
    }

    #[test]
    fn final_output_missing_without_assistant_message() {
        let result = RunResult::new(vec![ConversationItem::Reasoning]);
        assert!(result.final_output_text().is_none());
        assert!(RunResult::default().final_output_text().is_none());
    }

    #[test]
    fn message_text_joins_blocks() {
        let item = ConversationItem::Message {
            role: Role::Assistant,
            content: vec![
                ContentBlock::OutputText { text: "承知".into() },
                ContentBlock::OutputText {
                    text: "いたしました。".into(),
                },
            ],
        };
        assert_eq!(item.text().as_deref(), Some("承知いたしました。"));
        assert_eq!(ConversationItem::Reasoning.text(), None);
    }

    #[test]
    fn run_config_collects_metadata() {
        let config = RunConfig::new("test workflow")
            .with_metadata("workflow_id", "wf_1")
            .with_metadata("__trace_source__", "agent-builder");
        assert_eq!(config.workflow_name, "test workflow");
        assert_eq!(config.trace_metadata.len(), 2);
        assert_eq!(config.trace_metadata["workflow_id"], "wf_1");
    }
}
