//! Run lifecycle events and the callback handler trait.
//!
//! Events decouple observability (logging, metrics, UI updates) from the
//! run controller's control flow. The event set is closed: handlers match
//! on the enum, no open-ended dynamic lookup. Dispatch is performed by the
//! controller's callback manager, sequentially and in registration order,
//! before the controller proceeds past the transition that produced the
//! event.

use async_trait::async_trait;

use crate::error::CallbackError;
use crate::message::Message;
use crate::step::{AgentResponse, PluginStep, ToolStep};

/// Lifecycle events fired during a run.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// A run began with the given prompt
    RunStart { prompt: String },

    /// The model is about to be consulted with this context
    LlmStart { messages: Vec<Message> },

    /// The model replied
    LlmEnd { reply: Message },

    /// The model client failed
    LlmError { error: String },

    /// A tool invocation is starting
    ToolStart { name: String, arguments: String },

    /// A tool invocation completed (successfully or with a recorded failure)
    ToolEnd { step: ToolStep },

    /// A tool invocation failed before a step could be recorded, or failed
    /// unrecoverably
    ToolError { name: String, error: String },

    /// A plugin result arrived in a model reply
    PluginStart { name: String },

    /// The plugin result was recorded as a step
    PluginEnd { step: PluginStep },

    /// A plugin result could not be processed
    PluginError { name: String, error: String },

    /// The run terminated without error
    RunEnd { response: AgentResponse },

    /// The run terminated with an error
    RunError { error: String },
}

impl AgentEvent {
    /// The event name, stable across payload changes.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentEvent::RunStart { .. } => "run_start",
            AgentEvent::LlmStart { .. } => "llm_start",
            AgentEvent::LlmEnd { .. } => "llm_end",
            AgentEvent::LlmError { .. } => "llm_error",
            AgentEvent::ToolStart { .. } => "tool_start",
            AgentEvent::ToolEnd { .. } => "tool_end",
            AgentEvent::ToolError { .. } => "tool_error",
            AgentEvent::PluginStart { .. } => "plugin_start",
            AgentEvent::PluginEnd { .. } => "plugin_end",
            AgentEvent::PluginError { .. } => "plugin_error",
            AgentEvent::RunEnd { .. } => "run_end",
            AgentEvent::RunError { .. } => "run_error",
        }
    }
}

/// A handler for run lifecycle events.
///
/// Handlers observe; they must not alter control flow. A handler returning
/// an error is logged and isolated by the dispatcher — the run proceeds.
#[async_trait]
pub trait CallbackHandler: Send + Sync {
    async fn on_event(&self, event: &AgentEvent) -> std::result::Result<(), CallbackError>;
}
