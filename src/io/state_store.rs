use serde_json::Value;

use crate::io::storage::{Storage, StorageError};
use crate::model::config::StorageKeys;
use crate::model::state::{ChecklistState, ViewMode};

/// Persists the checklist state and the view mode under two fixed identifiers
pub struct StateStore {
    storage: Box<dyn Storage>,
    keys: StorageKeys,
}

impl StateStore {
    pub fn new(storage: Box<dyn Storage>, keys: StorageKeys) -> Self {
        StateStore { storage, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Read the saved state. Missing, unreadable or malformed data yields an
    /// empty state; this never fails.
    pub fn load(&self) -> ChecklistState {
        let raw = match self.storage.get(&self.keys.state_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ChecklistState::new(),
            Err(e) => {
                tracing::warn!("could not read saved state, starting empty: {}", e);
                return ChecklistState::new();
            }
        };
        match decode_state(&raw) {
            Some(state) => state,
            None => {
                tracing::warn!(
                    key = %self.keys.state_key,
                    "saved state is not a JSON object, starting empty"
                );
                ChecklistState::new()
            }
        }
    }

    /// Overwrite the saved state with `state`
    pub fn save(&self, state: &ChecklistState) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(state)?;
        self.storage.set(&self.keys.state_key, &encoded)
    }

    /// Remove the saved state entirely
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.keys.state_key)
    }

    /// Last recorded view mode, `ByLines` when none or unrecognised
    pub fn load_view(&self) -> ViewMode {
        match self.storage.get(&self.keys.view_key) {
            Ok(Some(token)) => ViewMode::from_token(&token).unwrap_or_else(|| {
                tracing::debug!(token = %token, "unknown view mode token");
                ViewMode::default()
            }),
            Ok(None) => ViewMode::default(),
            Err(e) => {
                tracing::warn!("could not read view mode: {}", e);
                ViewMode::default()
            }
        }
    }

    pub fn save_view(&self, mode: ViewMode) -> Result<(), StorageError> {
        self.storage.set(&self.keys.view_key, mode.storage_token())
    }
}

/// Decode a `key -> flag` object. Non-boolean flags are read by truthiness
/// so blobs written by looser tools still load.
fn decode_state(raw: &str) -> Option<ChecklistState> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let map = value.as_object()?;
    let mut state = ChecklistState::new();
    for (key, flag) in map {
        state.set(key, truthy(flag));
    }
    Some(state)
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
