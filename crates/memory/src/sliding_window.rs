//! SlidingWindowMemory — retains at most the N most recent messages.

use async_trait::async_trait;
use tokio::sync::Mutex;

use cogent_core::error::MemoryError;
use cogent_core::memory::Memory;
use cogent_core::message::Message;

pub struct SlidingWindowMemory {
    messages: Mutex<Vec<Message>>,
    max_messages: usize,
}

impl SlidingWindowMemory {
    pub fn new(max_messages: usize) -> Self {
        assert!(max_messages > 0, "window size must be positive");
        Self {
            messages: Mutex::new(Vec::new()),
            max_messages,
        }
    }
}

#[async_trait]
impl Memory for SlidingWindowMemory {
    fn name(&self) -> &str {
        "sliding_window"
    }

    async fn add_message(&self, message: Message) -> Result<(), MemoryError> {
        let mut messages = self.messages.lock().await;
        messages.push(message);
        let len = messages.len();
        if len > self.max_messages {
            messages.drain(0..len - self.max_messages);
        }
        Ok(())
    }

    async fn messages(&self) -> Result<Vec<Message>, MemoryError> {
        Ok(self.messages.lock().await.clone())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        self.messages.lock().await.clear();
        Ok(())
    }
}
