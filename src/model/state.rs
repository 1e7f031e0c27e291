use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Checked flags by key. Keys that were never recorded read as unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistState {
    entries: BTreeMap<String, bool>,
}

impl ChecklistState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state where exactly the given keys are checked
    pub fn from_checked<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ChecklistState {
            entries: keys.into_iter().map(|k| (k.into(), true)).collect(),
        }
    }

    /// Stored value for `key`, `false` when absent
    pub fn get(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, checked: bool) {
        match self.entries.get_mut(key) {
            Some(v) => *v = checked,
            None => {
                self.entries.insert(key.to_string(), checked);
            }
        }
    }

    /// Whether the key has ever been recorded (checked or not)
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Keys whose stored value is true, ascending and unique
    pub fn checked_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, v)| **v)
            .map(|(k, _)| k.clone())
            .collect()
    }
}

/// Which of the two renderings is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Evolution lines grouped into sections, nested by depth
    #[default]
    ByLines,
    /// One flat row per key, sorted by numeric ID
    ById,
}

impl ViewMode {
    /// Short token used on the command line
    pub fn token(self) -> &'static str {
        match self {
            ViewMode::ByLines => "lines",
            ViewMode::ById => "id",
        }
    }

    /// Token written to storage
    pub fn storage_token(self) -> &'static str {
        match self {
            ViewMode::ByLines => "byLines",
            ViewMode::ById => "byId",
        }
    }

    /// Parse a stored or user-supplied token. Accepts the long forms too.
    pub fn from_token(s: &str) -> Option<ViewMode> {
        match s.trim() {
            "lines" | "byLines" => Some(ViewMode::ByLines),
            "id" | "byId" => Some(ViewMode::ById),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::ByLines => "View: by Lines",
            ViewMode::ById => "View: by ID",
        }
    }

    pub fn toggled(self) -> ViewMode {
        match self {
            ViewMode::ByLines => ViewMode::ById,
            ViewMode::ById => ViewMode::ByLines,
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
