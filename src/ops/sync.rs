use crate::io::state_store::StateStore;
use crate::io::storage::StorageError;
use crate::model::state::ChecklistState;
use crate::model::tree::Widget;
use crate::ops::key_index::KeyIndex;

/// Set every widget bearing `key` to `checked`
pub fn set_checked_for_key(widgets: &mut [Widget], index: &KeyIndex, key: &str, checked: bool) {
    for id in index.widgets_for(key) {
        if let Some(w) = widgets.get_mut(id.0) {
            w.checked = checked;
        }
    }
}

/// Resynchronize every widget from the state (absent keys read unchecked)
pub fn apply_state(widgets: &mut [Widget], state: &ChecklistState) {
    for w in widgets.iter_mut() {
        w.checked = state.get(&w.key);
    }
}

/// Record one toggle, persist it, then propagate it to every widget sharing
/// the key. Widgets are updated even when persisting fails; the storage
/// error is still returned.
pub fn on_toggle(
    state: &mut ChecklistState,
    store: &StateStore,
    widgets: &mut [Widget],
    index: &KeyIndex,
    key: &str,
    checked: bool,
) -> Result<(), StorageError> {
    state.set(key, checked);
    let saved = store.save(state);
    set_checked_for_key(widgets, index, key, checked);
    tracing::debug!(key, checked, "toggled");
    saved
}

/// Set every known key (not only the filtered ones) to `value`, persisting once
pub fn set_all(
    state: &mut ChecklistState,
    store: &StateStore,
    widgets: &mut [Widget],
    index: &KeyIndex,
    value: bool,
) -> Result<(), StorageError> {
    for key in index.all_keys() {
        state.set(key, value);
    }
    let saved = store.save(state);
    for key in index.all_keys() {
        set_checked_for_key(widgets, index, key, value);
    }
    tracing::debug!(value, keys = index.len(), "set all");
    saved
}
