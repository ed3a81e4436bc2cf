//! Email Reply Workflow: an HTTP front-end that drafts email replies with an LLM agent.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod workflow;
