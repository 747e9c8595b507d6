//! The file manager — owns file bytes and mints stable references.
//!
//! Everything else in the system holds `File` references only. The manager
//! keeps a registry of known references behind a lock; references
//! themselves are immutable once created, so lookups hand out clones.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, warn};

use cogent_core::error::FileError;
use cogent_core::file::{File, FilePurpose};

use crate::protocol;

/// Content storage plus a registry of file references.
pub struct FileManager {
    save_dir: PathBuf,
    registry: RwLock<HashMap<String, File>>,
}

impl FileManager {
    /// Create a manager that stores new files under `save_dir`. The
    /// directory must already exist.
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            registry: RwLock::new(HashMap::new()),
        }
    }

    /// Register an existing file on disk and return its reference.
    pub async fn create_file_from_path(
        &self,
        path: impl AsRef<Path>,
        purpose: FilePurpose,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<File, FileError> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| FileError::Storage(format!("cannot stat {}: {e}", path.display())))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let file = File {
            id: protocol::generate_file_id(),
            filename,
            byte_size: meta.len(),
            created_at: Utc::now(),
            purpose,
            metadata,
            path: path.to_path_buf(),
        };
        self.register(file.clone());
        Ok(file)
    }

    /// Store bytes under the save directory and return a reference.
    pub async fn create_file_from_bytes(
        &self,
        contents: &[u8],
        filename: &str,
        purpose: FilePurpose,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<File, FileError> {
        let id = protocol::generate_file_id();
        let filename = base_name(filename);
        let path = self.save_dir.join(format!("{id}-{filename}"));
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| FileError::Storage(format!("cannot write {}: {e}", path.display())))?;

        let file = File {
            id,
            filename,
            byte_size: contents.len() as u64,
            created_at: Utc::now(),
            purpose,
            metadata,
            path,
        };
        self.register(file.clone());
        debug!(file_id = %file.id, bytes = file.byte_size, "Stored new file");
        Ok(file)
    }

    /// Look up a registered file by id.
    pub fn look_up_file(&self, id: &str) -> Result<File, FileError> {
        let registry = self.registry.read().expect("file registry lock poisoned");
        registry
            .get(id)
            .cloned()
            .ok_or_else(|| FileError::NotFound(id.to_string()))
    }

    /// All registered files.
    pub fn list_files(&self) -> Vec<File> {
        let registry = self.registry.read().expect("file registry lock poisoned");
        let mut files: Vec<File> = registry.values().cloned().collect();
        files.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        files
    }

    /// Resolve a list of ids, preserving order. Unknown ids are skipped
    /// with a warning rather than failing the invocation.
    pub fn resolve_ids(&self, ids: &[String]) -> Vec<File> {
        let mut files = Vec::with_capacity(ids.len());
        for id in ids {
            match self.look_up_file(id) {
                Ok(file) => files.push(file),
                Err(_) => warn!(file_id = %id, "Ignoring unknown file id"),
            }
        }
        files
    }

    /// Files referenced by id anywhere inside a JSON payload.
    pub fn sniff_files_from_value(&self, value: &serde_json::Value) -> Vec<File> {
        self.resolve_ids(&protocol::extract_file_ids_from_value(value))
    }

    /// Files referenced by id in a free-form text.
    pub fn sniff_files_from_text(&self, text: &str) -> Vec<File> {
        self.resolve_ids(&protocol::extract_file_ids(text))
    }

    /// Copy a file's contents to `destination`.
    pub async fn write_contents_to(
        &self,
        file: &File,
        destination: impl AsRef<Path>,
    ) -> Result<(), FileError> {
        tokio::fs::copy(&file.path, destination.as_ref())
            .await
            .map_err(|e| {
                FileError::Storage(format!(
                    "cannot copy {} to {}: {e}",
                    file.path.display(),
                    destination.as_ref().display()
                ))
            })?;
        Ok(())
    }

    fn register(&self, file: File) {
        let mut registry = self.registry.write().expect("file registry lock poisoned");
        registry.insert(file.id.clone(), file);
    }
}

/// Reduce a caller-supplied filename to its final path component, so it
/// cannot steer the storage path outside the save directory.
fn base_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string())
}
