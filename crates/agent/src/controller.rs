//! The function-calling run controller.
//!
//! One run turns a single user request into zero or more capability
//! invocations and a final response. Each iteration consults the model,
//! classifies its reply (plain text, capability-call request, or text with
//! a plugin result), and either terminates or executes a step and loops.
//! The caller always receives a fully populated [`AgentResponse`]; `Err` is
//! reserved for catastrophic collaborator failures such as the memory
//! store breaking.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use cogent_core::chat_model::{ChatModel, ChatRequest};
use cogent_core::error::{Error, Result};
use cogent_core::event::AgentEvent;
use cogent_core::file::File;
use cogent_core::memory::Memory;
use cogent_core::message::{Message, Role};
use cogent_core::step::{AgentResponse, EndReason, PluginStep, Step, ToolInfo, ToolStep};
use cogent_core::tool::ToolRegistry;
use cogent_files::{FileManager, protocol};

use crate::callback::CallbackManager;
use crate::invoke;

const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Which messages from a run's transient chat history are committed to
/// memory at termination.
///
/// The policy applies only when a run terminates without error. Errored
/// and cancelled runs leave memory untouched, so a retry starts from the
/// same state the failed run saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitPolicy {
    /// The user's input message and the final reply (default)
    #[default]
    FirstAndLast,
    /// Every message, including capability-call scratch messages
    FullHistory,
    /// Commit nothing
    Nothing,
}

/// What happens after a plugin result arrives in a model reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluginContinuation {
    /// The accompanying text is the final answer (default)
    #[default]
    Terminal,
    /// The reply joins the chat history and the loop continues
    Continue,
}

/// An agent driven by the function-calling ability of the model.
pub struct FunctionAgent {
    llm: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    memory: Arc<dyn Memory>,
    file_manager: Arc<FileManager>,
    system: Option<String>,
    plugins: HashMap<String, PluginContinuation>,
    callbacks: CallbackManager,
    max_iterations: usize,
    commit_policy: CommitPolicy,
    is_running: AtomicBool,
}

impl FunctionAgent {
    pub fn new(
        llm: Arc<dyn ChatModel>,
        tools: ToolRegistry,
        memory: Arc<dyn Memory>,
        file_manager: Arc<FileManager>,
    ) -> Self {
        Self {
            llm,
            tools,
            memory,
            file_manager,
            system: None,
            plugins: HashMap::new(),
            callbacks: CallbackManager::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            commit_policy: CommitPolicy::default(),
            is_running: AtomicBool::new(false),
        }
    }

    /// Set the system instructions sent with every model request.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Enable a plugin and declare what happens after it fires.
    pub fn with_plugin(mut self, name: impl Into<String>, policy: PluginContinuation) -> Self {
        self.plugins.insert(name.into(), policy);
        self
    }

    /// Replace the callback manager (the default carries the built-in
    /// logging handler).
    pub fn with_callbacks(mut self, callbacks: CallbackManager) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Set the maximum number of iterations per run.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        assert!(max > 0, "max_iterations must be positive");
        self.max_iterations = max;
        self
    }

    /// Set the memory commit policy.
    pub fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.commit_policy = policy;
        self
    }

    /// Register a tool. Takes `&mut self`: the capability set cannot change
    /// while a run is borrowing the agent.
    pub fn load_tool(&mut self, tool: Arc<dyn cogent_core::tool::Tool>) {
        self.tools.load(tool);
    }

    /// Remove a tool by name.
    pub fn unload_tool(&mut self, name: &str) -> bool {
        self.tools.unload(name)
    }

    /// Names of the currently registered tools.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.names()
    }

    /// Run the agent for one user request.
    pub async fn run(&self, prompt: &str, files: &[File]) -> Result<AgentResponse> {
        self.run_with_cancel(prompt, files, CancellationToken::new())
            .await
    }

    /// Run the agent, honoring external cancellation at both suspension
    /// points (model call and capability execution).
    pub async fn run_with_cancel(
        &self,
        prompt: &str,
        files: &[File],
        cancel: CancellationToken,
    ) -> Result<AgentResponse> {
        if self.is_running.swap(true, Ordering::SeqCst) {
            return Err(Error::Internal("the agent is already running".into()));
        }
        let _guard = RunGuard {
            flag: &self.is_running,
        };

        self.callbacks
            .dispatch(&AgentEvent::RunStart {
                prompt: prompt.to_string(),
            })
            .await;

        let mut chat_history = vec![self.initial_message(prompt, files)];
        let mut steps: Vec<Step> = Vec::new();
        let mut iterations = 0usize;

        let termination = loop {
            if iterations >= self.max_iterations {
                break Termination::failed(
                    EndReason::MaxIterationsExceeded,
                    "the maximum number of iterations was reached",
                );
            }
            iterations += 1;
            debug!(iteration = iterations, "Run iteration");

            // AWAITING_MODEL: assemble context and consult the model.
            let mut context = self.memory.messages().await.map_err(Error::Memory)?;
            context.extend(chat_history.iter().cloned());

            let request = ChatRequest {
                messages: context.clone(),
                functions: self.tools.schemas(),
                system: self.system.clone(),
                plugins: self.plugin_names(),
            };

            self.callbacks
                .dispatch(&AgentEvent::LlmStart { messages: context })
                .await;

            let reply = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    break Termination::failed(EndReason::Cancelled, "the run was cancelled");
                }
                reply = self.llm.chat(request) => reply,
            };

            let reply = match reply {
                Ok(message) => {
                    self.callbacks
                        .dispatch(&AgentEvent::LlmEnd {
                            reply: message.clone(),
                        })
                        .await;
                    message
                }
                Err(e) => {
                    self.callbacks
                        .dispatch(&AgentEvent::LlmError {
                            error: e.to_string(),
                        })
                        .await;
                    break Termination::failed(
                        EndReason::ModelError,
                        format!("the model call failed: {e}"),
                    );
                }
            };

            // Classify the reply.
            if let Some(call) = reply.function_call.clone() {
                // EXECUTING_STEP
                chat_history.push(reply);
                self.callbacks
                    .dispatch(&AgentEvent::ToolStart {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    })
                    .await;

                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        break Termination::failed(EndReason::Cancelled, "the run was cancelled");
                    }
                    outcome = invoke::invoke_tool(&self.tools, &self.file_manager, &call) => outcome,
                };

                match outcome {
                    Ok(step) => {
                        self.callbacks
                            .dispatch(&AgentEvent::ToolEnd { step: step.clone() })
                            .await;
                        chat_history
                            .push(Message::function_result(&call.name, step.result.to_string()));
                        steps.push(Step::Tool(step));
                    }
                    Err(e) => {
                        self.callbacks
                            .dispatch(&AgentEvent::ToolError {
                                name: call.name.clone(),
                                error: e.to_string(),
                            })
                            .await;
                        if !e.is_recoverable() {
                            break Termination::failed(
                                EndReason::CapabilityError,
                                format!("capability '{}' failed: {e}", call.name),
                            );
                        }
                        // Record the failure and let the model see it, so
                        // it can retry or choose differently.
                        let step = ToolStep {
                            info: ToolInfo {
                                name: call.name.clone(),
                                arguments: call.arguments.clone(),
                            },
                            success: false,
                            result: serde_json::json!({ "error": e.to_string() }),
                            input_files: Vec::new(),
                            output_files: Vec::new(),
                        };
                        chat_history
                            .push(Message::function_result(&call.name, format!("Error: {e}")));
                        steps.push(Step::Tool(step));
                    }
                }
                continue;
            }

            if let Some(info) = reply.plugin_info.clone() {
                self.callbacks
                    .dispatch(&AgentEvent::PluginStart {
                        name: info.name.clone(),
                    })
                    .await;

                // The plugin already ran on the model side; record what it
                // consumed and produced.
                let input_files = chat_history
                    .last()
                    .map(|m| self.file_manager.sniff_files_from_text(&m.content))
                    .unwrap_or_default();
                let step = PluginStep {
                    info: info.clone(),
                    result: reply.content.clone(),
                    input_files,
                    output_files: Vec::new(),
                };
                self.callbacks
                    .dispatch(&AgentEvent::PluginEnd { step: step.clone() })
                    .await;
                steps.push(Step::Plugin(step));

                let policy = self.plugins.get(&info.name).copied().unwrap_or_default();
                chat_history.push(reply.clone());
                match policy {
                    PluginContinuation::Terminal => {
                        break Termination::completed(reply.content, EndReason::Finished);
                    }
                    PluginContinuation::Continue => continue,
                }
            }

            // Plain text: the run is over.
            let reason = if reply.clarify {
                EndReason::Clarify
            } else {
                EndReason::Finished
            };
            chat_history.push(reply.clone());
            break Termination::completed(reply.content, reason);
        };

        self.finalize(termination, chat_history, steps).await
    }

    /// Commit the selected history to memory and dispatch the terminal
    /// event. Memory is only touched here, never mid-iteration.
    async fn finalize(
        &self,
        termination: Termination,
        chat_history: Vec<Message>,
        steps: Vec<Step>,
    ) -> Result<AgentResponse> {
        let (text, end_reason, error) = match termination {
            Termination::Completed { text, reason } => (text, reason, None),
            Termination::Failed { reason, error } => (error.clone(), reason, Some(error)),
        };

        let response = AgentResponse {
            text,
            chat_history,
            steps,
            end_reason,
        };

        if let Some(error) = error {
            self.callbacks
                .dispatch(&AgentEvent::RunError { error })
                .await;
        } else {
            self.commit_to_memory(&response).await?;
            self.callbacks
                .dispatch(&AgentEvent::RunEnd {
                    response: response.clone(),
                })
                .await;
        }

        Ok(response)
    }

    async fn commit_to_memory(&self, response: &AgentResponse) -> Result<()> {
        match self.commit_policy {
            CommitPolicy::Nothing => {}
            CommitPolicy::FullHistory => {
                for message in &response.chat_history {
                    self.memory
                        .add_message(message.clone())
                        .await
                        .map_err(Error::Memory)?;
                }
            }
            CommitPolicy::FirstAndLast => {
                let (Some(first), Some(last)) =
                    (response.chat_history.first(), response.chat_history.last())
                else {
                    return Ok(());
                };
                if response.chat_history.len() < 2
                    || first.role != Role::User
                    || last.role != Role::Assistant
                {
                    warn!("Chat history is incomplete; skipping memory commit");
                    return Ok(());
                }
                self.memory
                    .add_message(first.clone())
                    .await
                    .map_err(Error::Memory)?;
                self.memory
                    .add_message(last.clone())
                    .await
                    .map_err(Error::Memory)?;
            }
        }
        Ok(())
    }

    /// Build the run's leading message: the prompt, with descriptors for
    /// any supplied files appended so the model can refer to them by id.
    fn initial_message(&self, prompt: &str, files: &[File]) -> Message {
        if files.is_empty() {
            return Message::user(prompt);
        }
        if !protocol::extract_file_ids(prompt).is_empty() {
            warn!("File ids found in the prompt; ignoring the supplied files");
            return Message::user(prompt);
        }
        let reprs: Vec<String> = files.iter().map(File::repr).collect();
        Message::user(format!("{prompt}\n{}", reprs.join("\n")))
    }

    fn plugin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.keys().cloned().collect();
        names.sort();
        names
    }
}

enum Termination {
    Completed { text: String, reason: EndReason },
    Failed { reason: EndReason, error: String },
}

impl Termination {
    fn completed(text: String, reason: EndReason) -> Self {
        Termination::Completed { text, reason }
    }

    fn failed(reason: EndReason, error: impl Into<String>) -> Self {
        Termination::Failed {
            reason,
            error: error.into(),
        }
    }
}

/// Clears the re-entrancy flag even if the run future is dropped.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
