use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::tree::{ChecklistTree, Node, Section, SectionKind, Widget, WidgetId};

/// Sort position for items that carry no numeric ID
const NO_ID: u32 = 999_999;

/// Longest slug used as a key for items without an ID
const MAX_SLUG_LEN: usize = 80;

static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z])\)").expect("level pattern"));
static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\d{3})").expect("id pattern"));
static LEVEL_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([A-Z]\)\s*").expect("level tag pattern"));
static TRAILING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+#\d{3}\s*$").expect("trailing id pattern"));
static MULTI_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern"));
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern"));

/// Parser knobs, usually taken from `[outline]` in checklist.toml
#[derive(Debug, Clone, Default)]
pub struct OutlineOptions {
    /// Lines after the first one starting with this text are standalone items.
    /// Empty disables the split.
    pub standalone_marker: String,
    /// Spaces per nesting level; 0 infers it
    pub indent_step: usize,
}

/// Fields extracted from one outline line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub key: String,
    pub name: String,
    pub id_str: String,
    pub sort_id: u32,
    pub level: String,
    pub text: String,
}

/// Extract key, name, ID and level from an item line like `Agumon (R) #001`
pub fn parse_item(raw: &str) -> ItemFields {
    let raw = raw.trim();
    let level = LEVEL_RE
        .captures(raw)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    let id = ID_RE.captures(raw).and_then(|c| c[1].parse::<u32>().ok());
    let id_str = id.map(|i| format!("#{:03}", i)).unwrap_or_default();

    let name = LEVEL_TAG_RE.replace_all(raw, " ");
    let name = TRAILING_ID_RE.replace(name.trim(), "");
    let name = MULTI_SPACE_RE.replace_all(name.trim(), " ").to_string();

    let key = if id_str.is_empty() {
        slug(&name)
    } else {
        id_str.clone()
    };
    let text = format!("{} {} {}", name, id_str, level).to_lowercase();

    ItemFields {
        key,
        name,
        id_str,
        sort_id: id.unwrap_or(NO_ID),
        level,
        text,
    }
}

fn slug(name: &str) -> String {
    let lower = name.to_lowercase();
    let dashed = SLUG_RE.replace_all(&lower, "-");
    let trimmed: String = dashed.trim_matches('-').chars().take(MAX_SLUG_LEN).collect();
    if trimmed.is_empty() {
        "item".to_string()
    } else {
        trimmed
    }
}

fn count_indent(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// A block of consecutive non-blank lines: `(indent, text)` pairs
type Block<'a> = Vec<(usize, &'a str)>;

enum Pending<'a> {
    Line(Block<'a>),
    Solo(&'a str),
}

/// Parse outline text into both views of a checklist.
///
/// Blank lines separate evolution lines; indentation nests items within a
/// line. Every node in either view gets its own widget.
pub fn parse_outline(text: &str, opts: &OutlineOptions) -> ChecklistTree {
    let lines: Vec<&str> = text.lines().collect();

    let marker = opts.standalone_marker.trim().to_lowercase();
    let marker_idx = if marker.is_empty() {
        None
    } else {
        lines
            .iter()
            .position(|l| l.trim().to_lowercase().starts_with(&marker))
    };
    let (main_lines, solo_lines) = match marker_idx {
        Some(i) => (&lines[..i], &lines[i + 1..]),
        None => (&lines[..], &lines[lines.len()..]),
    };

    // Blocks
    let mut blocks: Vec<Block> = Vec::new();
    let mut cur: Block = Vec::new();
    for line in main_lines {
        if line.trim().is_empty() {
            if !cur.is_empty() {
                blocks.push(std::mem::take(&mut cur));
            }
        } else {
            cur.push((count_indent(line), line.trim()));
        }
    }
    if !cur.is_empty() {
        blocks.push(cur);
    }

    let step = if opts.indent_step > 0 {
        opts.indent_step
    } else {
        blocks
            .iter()
            .flatten()
            .map(|(indent, _)| *indent)
            .filter(|i| *i > 0)
            .min()
            .unwrap_or(2)
    };

    let solo: Vec<&str> = solo_lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    // Order sections by (root id, lines before solos, name)
    let mut pending: Vec<(u32, u8, String, Pending)> = Vec::new();
    for block in &blocks {
        let root = parse_item(block[0].1);
        pending.push((root.sort_id, 0, root.name.to_lowercase(), Pending::Line(block.clone())));
    }
    for raw in &solo {
        let item = parse_item(raw);
        pending.push((item.sort_id, 1, item.name.to_lowercase(), Pending::Solo(raw)));
    }
    pending.sort_by(|a, b| (a.0, a.1, &a.2).cmp(&(b.0, b.1, &b.2)));

    let mut tree = ChecklistTree::default();

    for (n, (_, _, _, entry)) in pending.into_iter().enumerate() {
        let section = match entry {
            Pending::Line(block) => build_line_section(&mut tree.widgets, n + 1, &block, step),
            Pending::Solo(raw) => build_solo_section(&mut tree.widgets, n + 1, raw),
        };
        tree.sections.push(section);
    }

    // By-ID rows: first occurrence of each key, in document order
    let mut seen = HashSet::new();
    let mut rows: Vec<ItemFields> = Vec::new();
    for raw in blocks.iter().flatten().map(|(_, t)| *t).chain(solo.iter().copied()) {
        let item = parse_item(raw);
        if seen.insert(item.key.clone()) {
            rows.push(item);
        }
    }
    rows.sort_by(|a, b| {
        (a.sort_id, a.name.to_lowercase()).cmp(&(b.sort_id, b.name.to_lowercase()))
    });
    for item in rows {
        let node = make_node(&mut tree.widgets, item, 0, None);
        tree.id_rows.push(node);
    }

    tree
}

fn make_node(
    widgets: &mut Vec<Widget>,
    item: ItemFields,
    depth: usize,
    parent: Option<usize>,
) -> Node {
    let widget = WidgetId(widgets.len());
    widgets.push(Widget {
        key: item.key.clone(),
        checked: false,
    });
    Node {
        key: item.key,
        name: item.name,
        id_str: item.id_str,
        sort_id: item.sort_id,
        level: item.level,
        text: item.text,
        depth,
        parent,
        widget,
        hidden: false,
    }
}

fn build_line_section(widgets: &mut Vec<Widget>, n: usize, block: &Block, step: usize) -> Section {
    let root = parse_item(block[0].1);
    let mut nodes: Vec<Node> = Vec::with_capacity(block.len());
    // (depth, node index) of the open ancestors
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for (indent, raw) in block {
        let depth = indent / step;
        while stack.last().is_some_and(|(d, _)| *d >= depth) {
            stack.pop();
        }
        let parent = stack.last().map(|(_, i)| *i);
        let node = make_node(widgets, parse_item(raw), depth, parent);
        stack.push((depth, nodes.len()));
        nodes.push(node);
    }

    Section {
        id: format!("root-{}", n),
        kind: SectionKind::Line,
        title: root.name,
        id_str: root.id_str,
        nodes,
        hidden: false,
        collapsed: false,
    }
}

fn build_solo_section(widgets: &mut Vec<Widget>, n: usize, raw: &str) -> Section {
    let item = parse_item(raw);
    let title = item.name.clone();
    let id_str = item.id_str.clone();
    let node = make_node(widgets, item, 0, None);
    Section {
        id: format!("solo-{}", n),
        kind: SectionKind::Solo,
        title,
        id_str,
        nodes: vec![node],
        hidden: false,
        collapsed: false,
    }
}
