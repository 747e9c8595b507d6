//! Memory trait — the durable, cross-run conversation log.
//!
//! Memory is owned by the caller and shared with the run controller, which
//! treats it as append-only: it reads the full log when assembling model
//! context and appends selected messages at run commit points, never
//! mid-iteration.

use async_trait::async_trait;

use crate::error::MemoryError;
use crate::message::Message;

/// The core Memory trait.
///
/// Implementations decide their own retention policy (keep everything,
/// sliding window, token budget). The controller only relies on ordering:
/// `messages()` returns the retained log oldest first.
#[async_trait]
pub trait Memory: Send + Sync {
    /// The store name (e.g. "whole", "sliding_window").
    fn name(&self) -> &str;

    /// Append a message to the log.
    async fn add_message(&self, message: Message) -> std::result::Result<(), MemoryError>;

    /// The retained log, oldest first.
    async fn messages(&self) -> std::result::Result<Vec<Message>, MemoryError>;

    /// Drop all retained messages.
    async fn clear(&self) -> std::result::Result<(), MemoryError>;
}
