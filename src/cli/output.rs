use serde::Serialize;

use crate::checklist::Checklist;
use crate::model::state::ViewMode;
use crate::model::tree::{Node, Section, SectionKind};
use crate::ops::key_index::CheckCount;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct NodeJson {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub level: String,
    pub depth: usize,
    pub checked: bool,
}

#[derive(Serialize)]
pub struct SectionJson {
    pub id: String,
    pub kind: SectionKind,
    pub title: String,
    pub nodes: Vec<NodeJson>,
}

#[derive(Serialize)]
pub struct CountJson {
    pub checked: usize,
    pub total: usize,
}

#[derive(Serialize)]
pub struct ListJson {
    pub view: String,
    pub count: CountJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionJson>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<NodeJson>>,
}

#[derive(Serialize)]
pub struct LevelJson {
    pub tag: String,
    pub nodes: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn node_to_json(node: &Node, checklist: &Checklist) -> NodeJson {
    NodeJson {
        key: node.key.clone(),
        name: node.name.clone(),
        id: node.id_str.clone(),
        level: node.level.clone(),
        depth: node.depth,
        checked: checklist.is_checked(node.widget),
    }
}

pub fn count_to_json(count: CheckCount) -> CountJson {
    CountJson {
        checked: count.checked,
        total: count.total,
    }
}

/// The visible part of one view
pub fn list_to_json(checklist: &Checklist, mode: ViewMode) -> ListJson {
    let tree = checklist.tree();
    let (sections, rows) = match mode {
        ViewMode::ByLines => (
            Some(
                tree.sections
                    .iter()
                    .filter(|s| !s.hidden)
                    .map(|s| SectionJson {
                        id: s.id.clone(),
                        kind: s.kind,
                        title: s.title.clone(),
                        nodes: s
                            .visible_nodes()
                            .map(|n| node_to_json(n, checklist))
                            .collect(),
                    })
                    .collect(),
            ),
            None,
        ),
        ViewMode::ById => (
            None,
            Some(
                tree.id_rows
                    .iter()
                    .filter(|n| !n.hidden)
                    .map(|n| node_to_json(n, checklist))
                    .collect(),
            ),
        ),
    };
    ListJson {
        view: mode.token().to_string(),
        count: count_to_json(checklist.count()),
        sections,
        rows,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn check_char(checked: bool) -> char {
    if checked { 'x' } else { ' ' }
}

/// `[x] #005 Agumon (R)`
pub fn format_node_line(node: &Node, checked: bool) -> String {
    let id = if node.id_str.is_empty() {
        String::new()
    } else {
        format!("{} ", node.id_str)
    };
    let level = if node.level.is_empty() {
        String::new()
    } else {
        format!(" ({})", node.level)
    };
    format!("[{}] {}{}{}", check_char(checked), id, node.name, level)
}

pub fn format_section_header(section: &Section) -> String {
    if section.id_str.is_empty() {
        format!("== {} [{}]", section.title, section.kind)
    } else {
        format!("== {} {} [{}]", section.title, section.id_str, section.kind)
    }
}

/// Lines for the visible part of one view, without the count
pub fn format_listing(checklist: &Checklist, mode: ViewMode) -> Vec<String> {
    let tree = checklist.tree();
    let mut lines = Vec::new();
    match mode {
        ViewMode::ByLines => {
            for section in tree.sections.iter().filter(|s| !s.hidden) {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(format_section_header(section));
                for node in section.visible_nodes() {
                    lines.push(format!(
                        "{}{}",
                        "  ".repeat(node.depth),
                        format_node_line(node, checklist.is_checked(node.widget))
                    ));
                }
            }
        }
        ViewMode::ById => {
            for node in tree.id_rows.iter().filter(|n| !n.hidden) {
                lines.push(format_node_line(node, checklist.is_checked(node.widget)));
            }
        }
    }
    lines
}
