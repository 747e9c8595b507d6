//! Error types for the Cogent domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the top-level `Error`
//! aggregates them for APIs that cross context boundaries.

use thiserror::Error;

/// The top-level error type for all Cogent operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Chat model errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Capability (tool/plugin) errors ---
    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    // --- File manager errors ---
    #[error("File error: {0}")]
    File(#[from] FileError),

    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures communicating with the language-model client.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed model reply: {0}")]
    MalformedReply(String),
}

/// Failures resolving or invoking a capability (tool or plugin).
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Capability not found: {0}")]
    NotFound(String),

    #[error("Invalid capability arguments: {0}")]
    InvalidArguments(String),

    #[error("Capability execution failed: {name} — {reason}")]
    ExecutionFailed { name: String, reason: String },
}

impl CapabilityError {
    /// Whether the agent loop may continue after this failure by reporting
    /// it to the model. Resolution failures are structural: the registered
    /// capability set cannot change mid-run, so retrying is pointless.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CapabilityError::NotFound(_))
    }
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Memory storage error: {0}")]
    Storage(String),
}

/// A failure inside a callback handler. Isolated by the dispatcher, never
/// propagated into the run.
#[derive(Debug, Error)]
#[error("Callback handler failed: {0}")]
pub struct CallbackError(pub String);
