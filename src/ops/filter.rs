use std::collections::BTreeSet;

use crate::model::tree::{ChecklistTree, Node, Section};

/// Search term plus active level tags.
///
/// An empty term matches every node, and so does an empty level set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    term: String,
    levels: BTreeSet<String>,
}

/// How much of each view survived a filter run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStats {
    pub visible_line_nodes: usize,
    pub visible_sections: usize,
    pub visible_rows: usize,
}

impl FilterQuery {
    pub fn new<I, S>(term: &str, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterQuery {
            term: term.trim().to_lowercase(),
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    /// Normalized (trimmed, lowercased) term
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn levels(&self) -> &BTreeSet<String> {
        &self.levels
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty() && self.levels.is_empty()
    }

    pub fn matches(&self, node: &Node) -> bool {
        let term_ok = self.term.is_empty() || node.text.to_lowercase().contains(&self.term);
        let level_ok = self.levels.is_empty() || self.levels.contains(&node.level);
        term_ok && level_ok
    }
}

/// Flat view: each row's visibility is its own match result
pub fn filter_id_view(rows: &mut [Node], query: &FilterQuery) -> usize {
    let mut visible = 0;
    for row in rows.iter_mut() {
        row.hidden = !query.matches(row);
        if !row.hidden {
            visible += 1;
        }
    }
    visible
}

/// Grouped view: matching nodes reveal all their ancestors, then each
/// section is hidden iff none of its nodes are visible.
///
/// Every flag is recomputed from scratch, so repeated runs with the same
/// query give the same result.
pub fn filter_line_view(sections: &mut [Section], query: &FilterQuery) -> (usize, usize) {
    let mut visible_nodes = 0;
    let mut visible_sections = 0;

    for section in sections.iter_mut() {
        let matched: Vec<usize> = section
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| query.matches(node).then_some(i))
            .collect();

        for node in section.nodes.iter_mut() {
            node.hidden = true;
        }
        for &i in &matched {
            section.nodes[i].hidden = false;
            for ancestor in section.ancestors(i) {
                section.nodes[ancestor].hidden = false;
            }
        }

        let shown = section.visible_nodes().count();
        section.hidden = shown == 0;
        visible_nodes += shown;
        if !section.hidden {
            visible_sections += 1;
        }
    }

    (visible_nodes, visible_sections)
}

/// Run the filter over both views
pub fn filter_tree(tree: &mut ChecklistTree, query: &FilterQuery) -> FilterStats {
    let (visible_line_nodes, visible_sections) = filter_line_view(&mut tree.sections, query);
    let visible_rows = filter_id_view(&mut tree.id_rows, query);
    tracing::debug!(
        term = query.term(),
        levels = query.levels().len(),
        visible_line_nodes,
        visible_rows,
        "filtered"
    );
    FilterStats {
        visible_line_nodes,
        visible_sections,
        visible_rows,
    }
}
