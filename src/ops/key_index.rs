use indexmap::IndexMap;

use crate::model::tree::{Widget, WidgetId};

/// Maps each logical key to every widget that renders it.
///
/// Built once from the widget arena; keys keep first-seen order.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    by_key: IndexMap<String, Vec<WidgetId>>,
}

/// Checked vs. total distinct keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckCount {
    pub checked: usize,
    pub total: usize,
}

impl std::fmt::Display for CheckCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} checked", self.checked, self.total)
    }
}

impl KeyIndex {
    pub fn build(widgets: &[Widget]) -> Self {
        let mut by_key: IndexMap<String, Vec<WidgetId>> = IndexMap::new();
        for (i, w) in widgets.iter().enumerate() {
            by_key.entry(w.key.clone()).or_default().push(WidgetId(i));
        }
        KeyIndex { by_key }
    }

    /// Widgets bearing `key` (empty for unknown keys)
    pub fn widgets_for(&self, key: &str) -> &[WidgetId] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Distinct keys across both views
    pub fn all_keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Keys with at least one checked widget
    pub fn checked_keys<'a>(&'a self, widgets: &'a [Widget]) -> impl Iterator<Item = &'a str> {
        self.by_key
            .iter()
            .filter(|(_, ids)| {
                ids.iter()
                    .any(|id| widgets.get(id.0).is_some_and(|w| w.checked))
            })
            .map(|(k, _)| k.as_str())
    }

    pub fn count(&self, widgets: &[Widget]) -> CheckCount {
        CheckCount {
            checked: self.checked_keys(widgets).count(),
            total: self.len(),
        }
    }
}
