//! Steps and the agent response envelope.
//!
//! A run produces an ordered sequence of zero or more steps, one per
//! capability invocation, in execution order. The `AgentResponse` is built
//! exactly once per run, at termination, and is immutable thereafter.

use serde::{Deserialize, Serialize};

use crate::file::File;
use crate::message::{Message, PluginInfo};

/// Identifying info for a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// The capability name
    pub name: String,

    /// The serialized argument payload the model produced
    pub arguments: String,
}

/// One tool invocation and its recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStep {
    pub info: ToolInfo,

    /// Whether the tool ran to completion. When false, `result` encodes the
    /// error instead of an output payload.
    pub success: bool,

    /// The structured result payload
    pub result: serde_json::Value,

    /// Input files resolved for this invocation, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_files: Vec<File>,

    /// Output files produced by this invocation, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_files: Vec<File>,
}

/// One plugin result recorded from a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginStep {
    pub info: PluginInfo,

    /// The plugin's textual result
    pub result: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_files: Vec<File>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_files: Vec<File>,
}

/// A step taken by the agent within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Tool(ToolStep),
    Plugin(PluginStep),
}

impl Step {
    /// The capability name this step invoked.
    pub fn capability_name(&self) -> &str {
        match self {
            Step::Tool(s) => &s.info.name,
            Step::Plugin(s) => &s.info.name,
        }
    }

    /// All files associated with this step, inputs first.
    pub fn files(&self) -> Vec<&File> {
        let (inputs, outputs) = match self {
            Step::Tool(s) => (&s.input_files, &s.output_files),
            Step::Plugin(s) => (&s.input_files, &s.output_files),
        };
        inputs.iter().chain(outputs.iter()).collect()
    }
}

/// Why a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndReason {
    /// The model produced a final answer
    Finished,
    /// The model asked the user for clarification
    Clarify,
    /// The model client failed
    ModelError,
    /// A capability failed in a way designated unrecoverable
    CapabilityError,
    /// The configured iteration guard tripped
    MaxIterationsExceeded,
    /// The run was cancelled externally
    Cancelled,
}

impl EndReason {
    /// Whether this reason represents an error termination.
    pub fn is_error(&self) -> bool {
        !matches!(self, EndReason::Finished | EndReason::Clarify)
    }
}

/// The final response from an agent run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// The final answer text
    pub text: String,

    /// The chat history produced during this run, starting with the user's
    /// input message
    pub chat_history: Vec<Message>,

    /// Steps in execution order
    pub steps: Vec<Step>,

    /// Why the run ended
    pub end_reason: EndReason,
}

impl AgentResponse {
    /// All files touched by the run's steps, in step order.
    pub fn files(&self) -> Vec<&File> {
        self.steps.iter().flat_map(|s| s.files()).collect()
    }
}
