//! # Cogent Core
//!
//! Domain types, traits, and error definitions for the Cogent agent
//! runtime. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod chat_model;
pub mod error;
pub mod event;
pub mod file;
pub mod memory;
pub mod message;
pub mod step;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use chat_model::{ChatModel, ChatRequest, FunctionSchema};
pub use error::{CallbackError, CapabilityError, Error, FileError, MemoryError, ModelError, Result};
pub use event::{AgentEvent, CallbackHandler};
pub use file::{File, FilePurpose};
pub use memory::Memory;
pub use message::{FunctionCall, Message, PluginInfo, Role};
pub use step::{AgentResponse, EndReason, PluginStep, Step, ToolInfo, ToolStep};
pub use tool::{Tool, ToolOutput, ToolRegistry};
