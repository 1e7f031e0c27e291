use std::path::PathBuf;

use super::config::ChecklistConfig;
use super::tree::ChecklistTree;

/// A fully loaded checklist project
#[derive(Debug)]
pub struct Project {
    /// Directory containing checklist.toml
    pub root: PathBuf,
    /// Parsed checklist.toml
    pub config: ChecklistConfig,
    /// Both views built from the outline source
    pub tree: ChecklistTree,
}

impl Project {
    /// Directory the file storage writes into
    pub fn storage_dir(&self) -> PathBuf {
        self.root.join(&self.config.storage.dir)
    }

    /// Level tags offered as filters, in display order
    pub fn level_tags(&self) -> Vec<String> {
        if self.config.levels.tags.is_empty() {
            self.tree.levels()
        } else {
            self.config.levels.tags.clone()
        }
    }
}
