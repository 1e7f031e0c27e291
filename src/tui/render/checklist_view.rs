use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use crate::model::tree::{Node, Section};
use crate::tui::app::{App, FlatItem};
use crate::util::unicode;

use super::{push_highlighted_spans, search_re};

fn check_symbol(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// Render the active view into the content area
pub fn render_checklist_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let items = app.build_flat_items();
    let bg = app.theme.background;

    if items.is_empty() {
        if app.checklist.query().is_empty() {
            let empty = Paragraph::new(" Empty checklist")
                .style(Style::default().fg(app.theme.dim).bg(bg));
            frame.render_widget(empty, area);
        } else {
            let msg = " no matches ";
            let padding = (area.width as usize).saturating_sub(msg.len() + 1);
            let warn_style = Style::default()
                .fg(app.theme.text_bright)
                .bg(Color::Rgb(0x8D, 0x0B, 0x0B))
                .add_modifier(Modifier::BOLD);
            let line = Line::from(vec![
                Span::styled(" ".repeat(padding), Style::default().bg(bg)),
                Span::styled(msg, warn_style),
            ]);
            frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        }
        return;
    }

    // Keep the cursor on screen
    let visible_height = area.height as usize;
    app.cursor = app.cursor.min(items.len() - 1);
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if visible_height > 0 && app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }

    let re = search_re(app);
    let width = area.width as usize;
    let end = items.len().min(app.scroll_offset + visible_height);
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);

    for (row, item) in items.iter().enumerate().take(end).skip(app.scroll_offset) {
        let is_cursor = row == app.cursor;
        let line = match item {
            FlatItem::Section { section } => {
                let section = &app.checklist.tree().sections[*section];
                section_line(app, section, is_cursor, width)
            }
            _ => match app.node_for(item) {
                Some(node) => node_line(app, node, is_cursor, width, re.as_ref()),
                None => Line::default(),
            },
        };
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Pad a line out to the full width so the cursor highlight spans the row
fn fill_row<'a>(spans: &mut Vec<Span<'a>>, style: Style, width: usize) {
    let used: usize = spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

fn section_line<'a>(app: &App, section: &Section, is_cursor: bool, width: usize) -> Line<'a> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let base = Style::default().bg(bg);
    let arrow = if section.collapsed { "\u{25B8}" } else { "\u{25BE}" };
    let done = section
        .nodes
        .iter()
        .filter(|n| app.checklist.is_checked(n.widget))
        .count();

    let mut spans = vec![
        Span::styled(format!("{} ", arrow), base.fg(app.theme.highlight)),
        Span::styled(
            section.title.clone(),
            base.fg(app.theme.text_bright).add_modifier(Modifier::BOLD),
        ),
    ];
    if !section.id_str.is_empty() {
        spans.push(Span::styled(
            format!(" {}", section.id_str),
            base.fg(app.theme.dim),
        ));
    }
    spans.push(Span::styled(
        format!("  {}  {}/{}", section.kind, done, section.nodes.len()),
        base.fg(app.theme.dim),
    ));
    fill_row(&mut spans, base, width);
    Line::from(spans)
}

fn node_line<'a>(
    app: &App,
    node: &Node,
    is_cursor: bool,
    width: usize,
    re: Option<&Regex>,
) -> Line<'a> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let base = Style::default().bg(bg);
    let checked = app.checklist.is_checked(node.widget);
    let match_style = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);

    let mut spans = vec![
        Span::styled("  ".repeat(node.depth + 1), base),
        Span::styled(
            check_symbol(checked),
            base.fg(app.theme.check_color(checked)),
        ),
        Span::styled(" ", base),
    ];
    if !node.id_str.is_empty() {
        push_highlighted_spans(
            &mut spans,
            &node.id_str,
            base.fg(app.theme.dim),
            match_style,
            re,
        );
        spans.push(Span::styled(" ", base));
    }
    let name_style = if checked {
        base.fg(app.theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else {
        base.fg(app.theme.text)
    };
    push_highlighted_spans(&mut spans, &node.name, name_style, match_style, re);
    if !node.level.is_empty() {
        spans.push(Span::styled(
            format!(" ({})", node.level),
            base.fg(app.theme.level_color(&node.level)),
        ));
    }
    fill_row(&mut spans, base, width);
    Line::from(spans)
}
