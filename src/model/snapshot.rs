use serde::{Deserialize, Serialize};

/// Current snapshot format version written on export
pub const SNAPSHOT_VERSION: u32 = 1;

/// The exported checked-set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub version: u32,
    /// RFC 3339 UTC timestamp with millisecond precision
    pub saved_at: String,
    /// Sorted, deduplicated checked keys
    pub checked: Vec<String>,
}

/// The only part of an imported document that is consulted.
/// Any other fields (including `version`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportDocument {
    pub checked: Vec<String>,
}
