//! File references — metadata handles for externally stored content.
//!
//! The controller and capabilities only ever hold `File` references; the
//! bytes themselves are owned by the file manager collaborator. References
//! are immutable once created.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a file is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    /// An input file supplied to a run
    #[default]
    Assistants,
    /// A file produced by a capability during a run
    AssistantsOutput,
}

/// A reference to a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Globally unique, stable identifier assigned by the file manager
    pub id: String,

    /// Display name
    pub filename: String,

    /// Size in bytes
    pub byte_size: u64,

    /// When the reference was created
    pub created_at: DateTime<Utc>,

    /// Purpose tag
    pub purpose: FilePurpose,

    /// Free-form metadata
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Storage location on disk
    pub path: PathBuf,
}

impl File {
    /// Render this file for inclusion in a prompt, so the model can refer
    /// to it by id.
    pub fn repr(&self) -> String {
        format!("<file>{}</file> ({})", self.id, self.filename)
    }
}
