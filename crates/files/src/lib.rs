//! # Cogent Files
//!
//! Content-addressed file storage for agent runs. The manager assigns
//! stable `file-local-<uuid>` identifiers to binary blobs and hands out
//! immutable [`cogent_core::File`] references; the file id protocol lets
//! capabilities and model replies refer to files by id inside text and
//! JSON payloads.

pub mod manager;
pub mod protocol;

pub use manager::FileManager;
