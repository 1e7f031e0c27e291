use serde::{Deserialize, Serialize};

/// Configuration from checklist.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistConfig {
    pub checklist: ChecklistInfo,
    #[serde(default)]
    pub outline: OutlineConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub levels: LevelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistInfo {
    /// Display title
    pub name: String,
    /// Namespace for storage identifiers and export file names
    pub id: String,
    /// Outline file, relative to the project root
    #[serde(default = "default_source")]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Lines after one starting with this text are standalone items
    #[serde(default = "default_marker")]
    pub standalone_marker: String,
    /// Spaces per nesting level; 0 infers it from the smallest indent
    #[serde(default)]
    pub indent_step: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        OutlineConfig {
            standalone_marker: default_marker(),
            indent_step: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding persisted blobs, relative to the project root
    #[serde(default = "default_storage_dir")]
    pub dir: String,
    #[serde(default)]
    pub state_key: Option<String>,
    #[serde(default)]
    pub view_key: Option<String>,
    #[serde(default)]
    pub export_prefix: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            dir: default_storage_dir(),
            state_key: None,
            view_key: None,
            export_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level tags offered as filters. Empty means "whatever the tree uses".
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_source() -> String {
    "checklist.txt".to_string()
}

fn default_marker() -> String {
    "The following Digimon have no evolution line".to_string()
}

fn default_storage_dir() -> String {
    ".checktree".to_string()
}

/// Resolved storage identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub state_key: String,
    pub view_key: String,
    pub export_prefix: String,
}

impl ChecklistConfig {
    pub fn storage_keys(&self) -> StorageKeys {
        let id = &self.checklist.id;
        StorageKeys {
            state_key: self
                .storage
                .state_key
                .clone()
                .unwrap_or_else(|| format!("{}_evo_checklist", id)),
            view_key: self
                .storage
                .view_key
                .clone()
                .unwrap_or_else(|| format!("{}_viewmode", id)),
            export_prefix: self
                .storage
                .export_prefix
                .clone()
                .unwrap_or_else(|| id.clone()),
        }
    }
}
