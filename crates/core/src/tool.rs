//! Tool trait — the abstraction over agent capabilities.
//!
//! A tool is an externally implemented capability invocable by name with a
//! structured argument payload. Tools are registered in the `ToolRegistry`
//! and made available to the run controller, which sends their schemas to
//! the model and executes them on request.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::chat_model::FunctionSchema;
use crate::error::CapabilityError;
use crate::file::File;

/// What a tool execution produced.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// The structured result payload
    pub result: serde_json::Value,

    /// Files the tool produced, already registered with the file manager
    pub output_files: Vec<File>,
}

impl ToolOutput {
    pub fn from_result(result: serde_json::Value) -> Self {
        Self {
            result,
            output_files: Vec::new(),
        }
    }
}

/// The core Tool trait.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g. "calculator").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with validated arguments and any resolved input
    /// files. Must execute at most once per call; retries are the caller's
    /// decision.
    async fn execute(
        &self,
        arguments: serde_json::Value,
        input_files: &[File],
    ) -> std::result::Result<ToolOutput, CapabilityError>;

    /// Convert this tool into a descriptor for the model.
    fn schema(&self) -> FunctionSchema {
        FunctionSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools, keyed by name.
///
/// Owned by the run controller. Loading and unloading take `&mut self`, so
/// the registered set cannot change while a run (which borrows the registry
/// shared) is in flight.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn load(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Remove a tool by name. Returns whether it was present.
    pub fn unload(&mut self, name: &str) -> bool {
        self.tools.remove(name).is_some()
    }

    /// Resolve a tool by name.
    pub fn get(&self, name: &str) -> std::result::Result<&Arc<dyn Tool>, CapabilityError> {
        self.tools
            .get(name)
            .ok_or_else(|| CapabilityError::NotFound(name.to_string()))
    }

    /// All capability descriptors, for sending to the model.
    pub fn schemas(&self) -> Vec<FunctionSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Names of all registered tools.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Arc<dyn Tool>> for ToolRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Tool>>>(tools: I) -> Self {
        let mut registry = Self::new();
        for tool in tools {
            registry.load(tool);
        }
        registry
    }
}
