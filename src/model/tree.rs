use serde::Serialize;

/// Handle to one checkbox widget in the tree's widget arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WidgetId(pub usize);

/// A rendered checkbox. Several widgets may share one key (one per view).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub key: String,
    pub checked: bool,
}

/// A single checklist entry in either view
#[derive(Debug, Clone)]
pub struct Node {
    /// Stable identity shared by every widget showing this item
    pub key: String,
    /// Display name with the level tag and ID stripped
    pub name: String,
    /// Zero-padded display ID like `#042`, empty when the item has none
    pub id_str: String,
    /// Numeric ID used for ordering (`u32::MAX`-ish sentinel when missing)
    pub sort_id: u32,
    /// Category tag used by the level filter (may be empty)
    pub level: String,
    /// Lowercased searchable text
    pub text: String,
    /// Nesting depth inside its section (0 = root)
    pub depth: usize,
    /// Index of the enclosing node within the same section
    pub parent: Option<usize>,
    pub widget: WidgetId,
    /// Set by the filter engine, never persisted
    pub hidden: bool,
}

/// Whether a section is a whole evolution line or a standalone item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Line,
    Solo,
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionKind::Line => write!(f, "Line"),
            SectionKind::Solo => write!(f, "No evolution"),
        }
    }
}

/// A top-level group in the by-lines view
#[derive(Debug, Clone)]
pub struct Section {
    /// `root-N` for lines, `solo-N` for standalone items
    pub id: String,
    pub kind: SectionKind,
    pub title: String,
    pub id_str: String,
    /// Nodes in document order; `Node::parent` indexes into this vec
    pub nodes: Vec<Node>,
    /// Derived: true iff no node in the section is visible
    pub hidden: bool,
    /// Presentation only
    pub collapsed: bool,
}

impl Section {
    /// Chain of enclosing node indices for `idx`, nearest first
    pub fn ancestors(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = self.nodes.get(idx).and_then(|n| n.parent);
        while let Some(p) = cur {
            out.push(p);
            cur = self.nodes.get(p).and_then(|n| n.parent);
        }
        out
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.hidden)
    }
}

/// Both renderings of one checklist, plus the widget arena they share
#[derive(Debug, Clone, Default)]
pub struct ChecklistTree {
    pub sections: Vec<Section>,
    pub id_rows: Vec<Node>,
    pub widgets: Vec<Widget>,
}

impl ChecklistTree {
    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id.0)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Every node of the by-lines view, section by section
    pub fn line_nodes(&self) -> impl Iterator<Item = &Node> {
        self.sections.iter().flat_map(|s| s.nodes.iter())
    }

    /// Distinct level tags in first-seen order, empty tags skipped
    pub fn levels(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for node in self.line_nodes().chain(self.id_rows.iter()) {
            if !node.level.is_empty() && !seen.iter().any(|l| l == &node.level) {
                seen.push(node.level.clone());
            }
        }
        seen
    }
}
