//! Message domain types.
//!
//! A conversation is an ordered sequence of messages; the order is replayed
//! to the model verbatim, so it is semantically significant. Messages are
//! immutable once appended to a chat history.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The model
    Assistant,
    /// A capability execution result fed back to the model
    Function,
}

/// A structured capability-call request produced by the model.
///
/// Never hand-constructed by the controller; it always originates from a
/// model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the capability to invoke
    pub name: String,

    /// The model's reasoning for this call, if it provided any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thoughts: Option<String>,

    /// Arguments as a JSON-encoded object
    pub arguments: String,
}

/// Identifying info for a plugin that fired on the model side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Name of the plugin that produced the result
    pub name: String,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// For function messages, the capability name the result belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A capability-call request embedded in an assistant message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,

    /// Present when the assistant reply carries a plugin result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_info: Option<PluginInfo>,

    /// Set when the assistant is asking the user for clarification rather
    /// than answering
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub clarify: bool,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            name: None,
            function_call: None,
            plugin_info: None,
            clarify: false,
        }
    }

    /// Create a new plain-text assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
            function_call: None,
            plugin_info: None,
            clarify: false,
        }
    }

    /// Create an assistant message that requests a capability call.
    pub fn function_call(call: FunctionCall) -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            name: None,
            function_call: Some(call),
            plugin_info: None,
            clarify: false,
        }
    }

    /// Create a function message carrying a capability result back to the
    /// model.
    pub fn function_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Function,
            content: content.into(),
            name: Some(name.into()),
            function_call: None,
            plugin_info: None,
            clarify: false,
        }
    }
}
