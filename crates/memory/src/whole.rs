//! WholeMemory — keeps the full conversation log, optionally pruned to a
//! token budget.
//!
//! Token counting is a cheap proxy: content length in characters. When a
//! budget is set and exceeded, the oldest messages are dropped until the
//! log fits again.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use cogent_core::error::MemoryError;
use cogent_core::memory::Memory;
use cogent_core::message::Message;

struct Log {
    messages: Vec<Message>,
    token_length: usize,
}

pub struct WholeMemory {
    log: Mutex<Log>,
    max_token_limit: Option<usize>,
}

impl WholeMemory {
    /// A memory that keeps everything.
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Log {
                messages: Vec::new(),
                token_length: 0,
            }),
            max_token_limit: None,
        }
    }

    /// A memory that prunes oldest-first once the retained content exceeds
    /// `max_token_limit`.
    pub fn with_token_limit(max_token_limit: usize) -> Self {
        assert!(max_token_limit > 0, "token limit must be positive");
        Self {
            log: Mutex::new(Log {
                messages: Vec::new(),
                token_length: 0,
            }),
            max_token_limit: Some(max_token_limit),
        }
    }
}

impl Default for WholeMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Memory for WholeMemory {
    fn name(&self) -> &str {
        "whole"
    }

    async fn add_message(&self, message: Message) -> Result<(), MemoryError> {
        let mut log = self.log.lock().await;

        // Reject before mutating: a failed add must leave the log unchanged.
        if let Some(limit) = self.max_token_limit {
            if message.content.len() > limit {
                return Err(MemoryError::Storage(format!(
                    "a single message exceeds the {limit}-token budget"
                )));
            }
        }

        log.token_length += message.content.len();
        log.messages.push(message);

        if let Some(limit) = self.max_token_limit {
            let mut dropped = 0;
            while log.token_length > limit && log.messages.len() > 1 {
                let removed = log.messages.remove(0);
                log.token_length -= removed.content.len();
                dropped += 1;
            }
            if dropped > 0 {
                debug!(dropped, "Pruned memory to token budget");
            }
        }
        Ok(())
    }

    async fn messages(&self) -> Result<Vec<Message>, MemoryError> {
        Ok(self.log.lock().await.messages.clone())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        let mut log = self.log.lock().await;
        log.messages.clear();
        log.token_length = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keeps_everything_without_limit() {
        let memory = WholeMemory::new();
        for i in 0..10 {
            memory.add_message(Message::user(format!("message {i}"))).await.unwrap();
        }
        assert_eq!(memory.messages().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn prunes_oldest_over_budget() {
        let memory = WholeMemory::with_token_limit(20);
        memory.add_message(Message::user("aaaaaaaaaa")).await.unwrap(); // 10
        memory.add_message(Message::assistant("bbbbbbbbbb")).await.unwrap(); // 10
        memory.add_message(Message::user("cccccc")).await.unwrap(); // over budget

        let messages = memory.messages().await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "bbbbbbbbbb");
        assert_eq!(messages[1].content, "cccccc");
    }

    #[tokio::test]
    async fn oversized_single_message_errors() {
        let memory = WholeMemory::with_token_limit(4);
        let err = memory.add_message(Message::user("too large to retain")).await.unwrap_err();
        assert!(matches!(err, MemoryError::Storage(_)));
        assert!(memory.messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_message_leaves_log_unchanged() {
        let memory = WholeMemory::with_token_limit(10);
        memory.add_message(Message::user("keep me")).await.unwrap();

        let err = memory
            .add_message(Message::assistant("this message is far over budget"))
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::Storage(_)));

        let messages = memory.messages().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "keep me");
    }

    #[tokio::test]
    async fn clear_resets_log() {
        let memory = WholeMemory::new();
        memory.add_message(Message::user("hi")).await.unwrap();
        memory.clear().await.unwrap();
        assert!(memory.messages().await.unwrap().is_empty());
    }
}
