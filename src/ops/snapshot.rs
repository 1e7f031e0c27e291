use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::io::file_access::FileAccessError;
use crate::io::storage::StorageError;
use crate::model::snapshot::{ExportSnapshot, ImportDocument, SNAPSHOT_VERSION};
use crate::model::state::ChecklistState;
use crate::ops::key_index::KeyIndex;

/// Shown to the user when an import file is rejected
pub const INVALID_IMPORT_MESSAGE: &str =
    "Invalid file. Please choose a JSON export from this checklist.";

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not save export: {0}")]
    Download(#[from] FileAccessError),
}

/// Error type for import operations
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Unparsable JSON or no usable `checked` array. State is untouched.
    #[error("Invalid file. Please choose a JSON export from this checklist.")]
    Invalid { detail: String },
    #[error("could not read import file: {0}")]
    Read(#[from] FileAccessError),
    #[error("could not save imported state: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome of a successful export
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub snapshot: ExportSnapshot,
    pub file_name: String,
    /// Where the download capability put the file
    pub location: String,
}

/// Outcome of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Distinct listed keys, all now checked
    pub imported: usize,
    /// How many of those no widget carries. They are kept in state.
    pub unknown: usize,
}

impl ImportReport {
    pub fn message(&self) -> String {
        if self.unknown == 0 {
            format!("Imported {} checked items.", self.imported)
        } else {
            format!(
                "Imported {} checked items ({} not in this checklist).",
                self.imported, self.unknown
            )
        }
    }
}

/// Build the snapshot of truthy keys at `now`
pub fn build_snapshot(state: &ChecklistState, now: DateTime<Utc>) -> ExportSnapshot {
    ExportSnapshot {
        version: SNAPSHOT_VERSION,
        saved_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        checked: state.checked_keys(),
    }
}

/// `<prefix>_<timestamp>.json` with `:` and `.` made filesystem-safe
pub fn export_file_name(prefix: &str, saved_at: &str) -> String {
    let stamp: String = saved_at
        .chars()
        .map(|c| if c == ':' || c == '.' { '-' } else { c })
        .collect();
    format!("{}_{}.json", prefix, stamp)
}

/// Pretty-printed JSON for the download
pub fn encode_snapshot(snapshot: &ExportSnapshot) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Parse an import file. Only `checked` is consulted; `version` is not
/// validated. Scalar entries become keys in their string form, nested
/// arrays and objects are skipped.
pub fn parse_import(bytes: &[u8]) -> Result<ImportDocument, ImportError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| ImportError::Invalid {
        detail: e.to_string(),
    })?;
    let Some(entries) = value.get("checked").and_then(Value::as_array) else {
        return Err(ImportError::Invalid {
            detail: "no `checked` array".to_string(),
        });
    };
    let checked = entries.iter().filter_map(entry_key).collect();
    Ok(ImportDocument { checked })
}

fn entry_key(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Replacement state for an import: every listed key is checked and
/// everything else becomes absent (unchecked). Keys the index does not
/// know are kept and only counted.
pub fn state_from_import(doc: &ImportDocument, index: &KeyIndex) -> (ChecklistState, ImportReport) {
    let mut state = ChecklistState::new();
    let mut unknown = BTreeSet::new();
    for key in &doc.checked {
        state.set(key, true);
        if !index.contains(key) {
            unknown.insert(key.as_str());
        }
    }
    let report = ImportReport {
        imported: state.len(),
        unknown: unknown.len(),
    };
    (state, report)
}
