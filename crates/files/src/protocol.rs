//! File id protocol.
//!
//! File ids follow the format `file-local-<uuid>`. Capabilities and model
//! replies refer to files by id inside free text and JSON payloads; this
//! module recognizes and extracts those references.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Prefix for ids minted by a local file manager.
pub const FILE_ID_PREFIX: &str = "file-local-";

fn file_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"file-local-[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .expect("file id pattern is valid")
    })
}

/// Mint a new globally unique file id.
pub fn generate_file_id() -> String {
    format!("{}{}", FILE_ID_PREFIX, Uuid::new_v4())
}

/// Whether the whole string is a well-formed file id.
pub fn is_file_id(s: &str) -> bool {
    file_id_pattern().is_match(s) && s.len() == FILE_ID_PREFIX.len() + 36
}

/// Extract all file ids mentioned in a text, in order of appearance.
pub fn extract_file_ids(text: &str) -> Vec<String> {
    file_id_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract all file ids mentioned anywhere in a JSON payload, in
/// depth-first order of appearance.
pub fn extract_file_ids_from_value(value: &serde_json::Value) -> Vec<String> {
    let mut ids = Vec::new();
    collect_ids(value, &mut ids);
    ids
}

fn collect_ids(value: &serde_json::Value, ids: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => ids.extend(extract_file_ids(s)),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_ids(item, ids);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values() {
                collect_ids(item, ids);
            }
        }
        _ => {}
    }
}
