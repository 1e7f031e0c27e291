//! The checklist controller.
//!
//! [`Checklist`] owns the tree, the key index, the persisted state and the
//! filter inputs. Every user action is one method call that leaves widgets,
//! state and storage consistent before returning.

use chrono::{DateTime, Utc};

use crate::io::file_access::{Download, FileSource};
use crate::io::state_store::StateStore;
use crate::io::storage::{Storage, StorageError};
use crate::model::project::Project;
use crate::model::state::{ChecklistState, ViewMode};
use crate::model::tree::{ChecklistTree, WidgetId};
use crate::ops::filter::{self, FilterQuery, FilterStats};
use crate::ops::key_index::{CheckCount, KeyIndex};
use crate::ops::snapshot::{
    self, ExportError, ExportReport, ImportError, ImportReport,
};
use crate::ops::sync;
use crate::ops::view_mode::ViewContainers;

/// Error type for checkbox operations
#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error("unknown key: {0}")]
    UnknownKey(String),
    #[error("no such widget: {0}")]
    UnknownWidget(usize),
    #[error("could not save state: {0}")]
    Storage(#[from] StorageError),
}

/// One level-filter control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelToggle {
    pub tag: String,
    pub active: bool,
}

pub struct Checklist {
    title: String,
    tree: ChecklistTree,
    index: KeyIndex,
    store: StateStore,
    state: ChecklistState,
    view: ViewMode,
    containers: ViewContainers,
    /// Raw search box contents
    term: String,
    levels: Vec<LevelToggle>,
    last_filter: FilterStats,
}

impl Checklist {
    /// Build the controller, load saved state and enter the saved view.
    pub fn new(
        title: impl Into<String>,
        tree: ChecklistTree,
        store: StateStore,
        level_tags: Vec<String>,
    ) -> Self {
        let index = KeyIndex::build(&tree.widgets);
        let state = store.load();
        let view = store.load_view();
        let mut checklist = Checklist {
            title: title.into(),
            tree,
            index,
            store,
            state,
            view,
            containers: ViewContainers::for_mode(view),
            term: String::new(),
            levels: level_tags
                .into_iter()
                .map(|tag| LevelToggle { tag, active: false })
                .collect(),
            last_filter: FilterStats::default(),
        };
        if let Err(e) = checklist.set_view_mode(view) {
            tracing::warn!("could not record initial view mode: {}", e);
        }
        checklist
    }

    /// Controller for a loaded project over the given storage
    pub fn open(project: Project, storage: Box<dyn Storage>) -> Self {
        let keys = project.config.storage_keys();
        let levels = project.level_tags();
        let title = project.config.checklist.name.clone();
        Checklist::new(title, project.tree, StateStore::new(storage, keys), levels)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tree(&self) -> &ChecklistTree {
        &self.tree
    }

    pub fn index(&self) -> &KeyIndex {
        &self.index
    }

    pub fn state(&self) -> &ChecklistState {
        &self.state
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn containers(&self) -> ViewContainers {
        self.containers
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn levels(&self) -> &[LevelToggle] {
        &self.levels
    }

    pub fn last_filter(&self) -> FilterStats {
        self.last_filter
    }

    /// Whether the widget is currently checked
    pub fn is_checked(&self, id: WidgetId) -> bool {
        self.tree.widget(id).is_some_and(|w| w.checked)
    }

    /// `(checked, total)` over distinct keys
    pub fn count(&self) -> CheckCount {
        self.index.count(&self.tree.widgets)
    }

    /// Current filter inputs
    pub fn query(&self) -> FilterQuery {
        FilterQuery::new(
            &self.term,
            self.levels
                .iter()
                .filter(|l| l.active)
                .map(|l| l.tag.clone()),
        )
    }

    // -----------------------------------------------------------------------
    // Checkbox synchronization
    // -----------------------------------------------------------------------

    /// Set `key` to `checked` everywhere and persist it
    pub fn on_toggle(&mut self, key: &str, checked: bool) -> Result<(), ChecklistError> {
        if !self.index.contains(key) {
            return Err(ChecklistError::UnknownKey(key.to_string()));
        }
        sync::on_toggle(
            &mut self.state,
            &self.store,
            &mut self.tree.widgets,
            &self.index,
            key,
            checked,
        )?;
        Ok(())
    }

    /// A click on one widget: flips it and syncs its key.
    /// Returns the new checked value.
    pub fn toggle_widget(&mut self, id: WidgetId) -> Result<bool, ChecklistError> {
        let widget = self
            .tree
            .widget_mut(id)
            .ok_or(ChecklistError::UnknownWidget(id.0))?;
        widget.checked = !widget.checked;
        let (key, checked) = (widget.key.clone(), widget.checked);
        self.on_toggle(&key, checked)?;
        Ok(checked)
    }

    /// Resync every widget from the in-memory state
    pub fn apply_state(&mut self) {
        sync::apply_state(&mut self.tree.widgets, &self.state);
    }

    /// Set every known key, visible or filtered out, to `value`
    pub fn set_all(&mut self, value: bool) -> Result<(), StorageError> {
        sync::set_all(
            &mut self.state,
            &self.store,
            &mut self.tree.widgets,
            &self.index,
            value,
        )
    }

    /// Forget all saved checks
    pub fn clear_state(&mut self) -> Result<(), StorageError> {
        let removed = self.store.clear();
        self.state = ChecklistState::new();
        self.apply_state();
        self.filter();
        tracing::info!("cleared saved state");
        removed
    }

    // -----------------------------------------------------------------------
    // View mode
    // -----------------------------------------------------------------------

    /// Enter `mode`: record it, swap containers, resync widgets and refilter
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<(), StorageError> {
        let saved = self.store.save_view(mode);
        self.view = mode;
        self.containers = ViewContainers::for_mode(mode);
        self.apply_state();
        self.filter();
        tracing::debug!(mode = %mode, "view mode");
        saved
    }

    pub fn toggle_view(&mut self) -> Result<(), StorageError> {
        self.set_view_mode(self.view.toggled())
    }

    // -----------------------------------------------------------------------
    // Filtering
    // -----------------------------------------------------------------------

    /// Replace the search term and refilter
    pub fn set_term(&mut self, term: &str) -> FilterStats {
        self.term = term.to_string();
        self.filter()
    }

    /// Set one level control by tag. Returns false for unknown tags.
    pub fn set_level(&mut self, tag: &str, active: bool) -> bool {
        let Some(level) = self.levels.iter_mut().find(|l| l.tag == tag) else {
            return false;
        };
        level.active = active;
        self.filter();
        true
    }

    /// Flip the level control at `idx`. Out-of-range is a no-op.
    pub fn toggle_level(&mut self, idx: usize) {
        if let Some(level) = self.levels.get_mut(idx) {
            level.active = !level.active;
            self.filter();
        }
    }

    /// Recompute visibility for both views from the current inputs
    pub fn filter(&mut self) -> FilterStats {
        let query = self.query();
        self.last_filter = filter::filter_tree(&mut self.tree, &query);
        self.last_filter
    }

    // -----------------------------------------------------------------------
    // Sections
    // -----------------------------------------------------------------------

    /// Flip a section's collapsed flag. Unknown ids are ignored.
    pub fn toggle_root(&mut self, section_id: &str) -> bool {
        match self.tree.section_mut(section_id) {
            Some(section) => {
                section.collapsed = !section.collapsed;
                true
            }
            None => false,
        }
    }

    pub fn expand_all(&mut self) {
        for section in &mut self.tree.sections {
            section.collapsed = false;
        }
    }

    pub fn collapse_all(&mut self) {
        for section in &mut self.tree.sections {
            section.collapsed = true;
        }
    }

    // -----------------------------------------------------------------------
    // Snapshot export / import
    // -----------------------------------------------------------------------

    pub fn export(&self, download: &dyn Download) -> Result<ExportReport, ExportError> {
        self.export_at(download, Utc::now())
    }

    /// Export with an explicit timestamp
    pub fn export_at(
        &self,
        download: &dyn Download,
        now: DateTime<Utc>,
    ) -> Result<ExportReport, ExportError> {
        let snapshot = snapshot::build_snapshot(&self.state, now);
        let file_name =
            snapshot::export_file_name(&self.store.keys().export_prefix, &snapshot.saved_at);
        let body = snapshot::encode_snapshot(&snapshot)?;
        let location = download.offer(body.as_bytes(), &file_name)?;
        tracing::info!(checked = snapshot.checked.len(), "exported to {}", location);
        Ok(ExportReport {
            snapshot,
            file_name,
            location,
        })
    }

    /// Replace the whole state with the keys listed in an export document.
    /// A malformed document leaves everything untouched.
    pub fn import_bytes(&mut self, bytes: &[u8]) -> Result<ImportReport, ImportError> {
        let doc = snapshot::parse_import(bytes).inspect_err(|e| {
            if let ImportError::Invalid { detail } = e {
                tracing::warn!("rejected import: {}", detail);
            }
        })?;
        let (state, report) = snapshot::state_from_import(&doc, &self.index);
        self.store.save(&state)?;
        self.state = state;
        self.apply_state();
        self.filter();
        tracing::info!(
            imported = report.imported,
            unknown = report.unknown,
            "imported snapshot"
        );
        Ok(report)
    }

    /// Read `handle` through the file capability, then import it
    pub fn import_file(
        &mut self,
        source: &dyn FileSource,
        handle: &str,
    ) -> Result<ImportReport, ImportError> {
        let bytes = source.read(handle)?;
        self.import_bytes(&bytes)
    }
}
