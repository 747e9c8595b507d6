//! Callback dispatch — ordered, isolated delivery of run events.
//!
//! Handlers are invoked sequentially in registration order. An event is
//! fully dispatched to every handler before the controller proceeds past
//! the transition that produced it. A failing handler is logged and
//! skipped; it never crashes the run.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use cogent_core::error::CallbackError;
use cogent_core::event::{AgentEvent, CallbackHandler};

/// An ordered list of callback handlers.
pub struct CallbackManager {
    handlers: Vec<Arc<dyn CallbackHandler>>,
}

impl CallbackManager {
    /// A manager with the given handlers, dispatched in the given order.
    pub fn new(handlers: Vec<Arc<dyn CallbackHandler>>) -> Self {
        Self { handlers }
    }

    /// A manager with no handlers at all.
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler; it will run after all previously added ones.
    pub fn add_handler(&mut self, handler: Arc<dyn CallbackHandler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Deliver an event to every handler, in order. Handler failures are
    /// isolated and logged.
    pub async fn dispatch(&self, event: &AgentEvent) {
        for handler in &self.handlers {
            if let Err(e) = handler.on_event(event).await {
                warn!(event = event.kind(), error = %e, "Callback handler failed");
            }
        }
    }
}

impl Default for CallbackManager {
    /// The default manager carries the built-in logging handler.
    fn default() -> Self {
        Self::new(vec![Arc::new(LoggingCallback)])
    }
}

/// The built-in handler: logs every event via `tracing`. The macros are
/// infallible, so this handler never fails a run.
pub struct LoggingCallback;

#[async_trait]
impl CallbackHandler for LoggingCallback {
    async fn on_event(&self, event: &AgentEvent) -> Result<(), CallbackError> {
        match event {
            AgentEvent::RunStart { prompt } => {
                info!(prompt = %preview(prompt), "Run started");
            }
            AgentEvent::LlmStart { messages } => {
                debug!(context_messages = messages.len(), "Consulting model");
            }
            AgentEvent::LlmEnd { reply } => {
                debug!(
                    has_function_call = reply.function_call.is_some(),
                    has_plugin_info = reply.plugin_info.is_some(),
                    "Model replied"
                );
            }
            AgentEvent::LlmError { error } => {
                warn!(error = %error, "Model call failed");
            }
            AgentEvent::ToolStart { name, arguments } => {
                info!(tool = %name, arguments = %preview(arguments), "Tool starting");
            }
            AgentEvent::ToolEnd { step } => {
                info!(tool = %step.info.name, success = step.success, "Tool finished");
            }
            AgentEvent::ToolError { name, error } => {
                warn!(tool = %name, error = %error, "Tool failed");
            }
            AgentEvent::PluginStart { name } => {
                info!(plugin = %name, "Plugin result received");
            }
            AgentEvent::PluginEnd { step } => {
                debug!(plugin = %step.info.name, "Plugin step recorded");
            }
            AgentEvent::PluginError { name, error } => {
                warn!(plugin = %name, error = %error, "Plugin step failed");
            }
            AgentEvent::RunEnd { response } => {
                info!(
                    end_reason = ?response.end_reason,
                    steps = response.steps.len(),
                    "Run finished"
                );
            }
            AgentEvent::RunError { error } => {
                warn!(error = %error, "Run failed");
            }
        }
        Ok(())
    }
}

fn preview(text: &str) -> &str {
    let end = text
        .char_indices()
        .nth(120)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    /// Records the order in which it saw event kinds.
    pub(crate) struct RecordingCallback {
        pub seen: Mutex<Vec<&'static str>>,
    }

    impl RecordingCallback {
        pub(crate) fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CallbackHandler for RecordingCallback {
        async fn on_event(&self, event: &AgentEvent) -> Result<(), CallbackError> {
            self.seen.lock().await.push(event.kind());
            Ok(())
        }
    }

    struct FailingCallback;

    #[async_trait]
    impl CallbackHandler for FailingCallback {
        async fn on_event(&self, _event: &AgentEvent) -> Result<(), CallbackError> {
            Err(CallbackError("boom".into()))
        }
    }

    #[tokio::test]
    async fn dispatch_preserves_registration_order() {
        let first = Arc::new(RecordingCallback::new());
        let second = Arc::new(RecordingCallback::new());
        let mut manager = CallbackManager::empty();
        manager.add_handler(first.clone());
        manager.add_handler(second.clone());

        manager
            .dispatch(&AgentEvent::RunStart {
                prompt: "hi".into(),
            })
            .await;
        manager
            .dispatch(&AgentEvent::RunError {
                error: "oops".into(),
            })
            .await;

        assert_eq!(*first.seen.lock().await, vec!["run_start", "run_error"]);
        assert_eq!(*second.seen.lock().await, vec!["run_start", "run_error"]);
    }

    #[tokio::test]
    async fn failing_handler_does_not_block_later_handlers() {
        let recorder = Arc::new(RecordingCallback::new());
        let manager = CallbackManager::new(vec![Arc::new(FailingCallback), recorder.clone()]);

        manager
            .dispatch(&AgentEvent::RunStart {
                prompt: "hi".into(),
            })
            .await;

        assert_eq!(*recorder.seen.lock().await, vec!["run_start"]);
    }

    #[tokio::test]
    async fn default_manager_has_logging_handler() {
        let manager = CallbackManager::default();
        assert_eq!(manager.len(), 1);
        // The logging handler never fails.
        manager
            .dispatch(&AgentEvent::LlmError {
                error: "unreachable".into(),
            })
            .await;
    }
}
