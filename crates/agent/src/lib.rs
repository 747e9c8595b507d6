//! # Cogent Agent
//!
//! The run controller: an iterative loop that turns one user request into
//! capability invocations and a final structured response.
//!
//! The entry point is [`FunctionAgent`]. It is wired from a
//! [`cogent_core::ChatModel`], a [`cogent_core::tool::ToolRegistry`], a
//! [`cogent_core::Memory`], and a [`cogent_files::FileManager`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use cogent_agent::FunctionAgent;
//! use cogent_core::tool::ToolRegistry;
//! use cogent_files::FileManager;
//! use cogent_memory::WholeMemory;
//! use cogent_tools::CalculatorTool;
//!
//! # async fn wire(llm: Arc<dyn cogent_core::ChatModel>) -> cogent_core::Result<()> {
//! let mut tools = ToolRegistry::new();
//! tools.load(Arc::new(CalculatorTool));
//!
//! let agent = FunctionAgent::new(
//!     llm,
//!     tools,
//!     Arc::new(WholeMemory::new()),
//!     Arc::new(FileManager::new("/tmp/agent-files")),
//! );
//! let response = agent.run("what is 4+5*8?", &[]).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod controller;
mod invoke;

pub use callback::{CallbackManager, LoggingCallback};
pub use controller::{CommitPolicy, FunctionAgent, PluginContinuation};
