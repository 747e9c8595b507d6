//! ChatModel trait — the abstraction over language-model clients.
//!
//! A ChatModel knows how to send a conversation plus the available
//! capability descriptors to a model and get a single reply message back.
//! The reply is classified by the run controller: plain text, a
//! capability-call request, or text accompanied by a plugin result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::message::Message;

/// A capability descriptor sent to the model so it knows what it can call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// The capability name
    pub name: String,

    /// Description of what the capability does
    pub description: String,

    /// JSON Schema describing the capability's parameters
    pub parameters: serde_json::Value,
}

/// A request to the model client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The conversation so far, oldest first
    pub messages: Vec<Message>,

    /// Capabilities the model may request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionSchema>,

    /// Instructions on how to interpret the conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Names of plugins enabled on the model side
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
}

/// The core ChatModel trait.
///
/// The run controller calls `chat()` without knowing which backend is in
/// use. Failures are returned as explicit errors, never panics.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// A human-readable name for this client (e.g. "mock", "openai").
    fn name(&self) -> &str;

    /// Send a request and get the model's reply message.
    async fn chat(&self, request: ChatRequest) -> std::result::Result<Message, ModelError>;
}
