use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::state::ViewMode;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Render the header: title row, filter row, separator
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title, view, count
            Constraint::Length(1), // search + levels
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_title_row(frame, app, chunks[0]);
    render_filter_row(frame, app, chunks[1]);

    let sep = Paragraph::new(Line::from(Span::styled(
        "\u{2500}".repeat(area.width as usize),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    )));
    frame.render_widget(sep, chunks[2]);
}

fn render_title_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let right = format!(
        "{}  {} ",
        app.checklist.view_mode().label(),
        app.checklist.count()
    );
    let right_width = unicode::display_width(&right);
    let title = unicode::truncate_to_width(
        app.checklist.title(),
        width.saturating_sub(right_width + 4),
    );

    let mut spans = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            "\u{2611}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    let used: usize = spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum();
    if used + right_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - right_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(right, Style::default().fg(app.theme.text).bg(bg)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
}

fn render_filter_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let term = app.checklist.term();
    let searching = app.mode == Mode::Search;

    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    if term.is_empty() && !searching {
        spans.push(Span::styled(
            "/ search",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    } else {
        let fg = if searching {
            app.theme.text_bright
        } else {
            app.theme.text
        };
        spans.push(Span::styled(
            format!("/{}", term),
            Style::default().fg(fg).bg(bg),
        ));
    }

    if !app.checklist.levels().is_empty() {
        spans.push(Span::styled("   ", Style::default().bg(bg)));
    }
    for (i, level) in app.checklist.levels().iter().enumerate().take(9) {
        let label = format!("{}:{}", i + 1, level.tag);
        let style = if level.active {
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.level_color(&level.tag))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.level_color(&level.tag)).bg(bg)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
    }

    let stats = app.checklist.last_filter();
    if !app.checklist.query().is_empty() {
        let shown = match app.checklist.view_mode() {
            ViewMode::ByLines => stats.visible_line_nodes,
            ViewMode::ById => stats.visible_rows,
        };
        spans.push(Span::styled(
            format!("   {} shown", shown),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_support::test_app;
    use crate::tui::render::test_helpers::{TERM_W, render_to_string};

    #[test]
    fn title_row_shows_view_and_count() {
        let app = test_app();
        let out = render_to_string(TERM_W, 3, |frame, area| {
            render_header(frame, &app, area);
        });
        let first = out.lines().next().unwrap();
        assert!(first.contains("Test"));
        assert!(first.contains("View: by Lines"));
        assert!(first.contains("0/6 checked"));
    }

    #[test]
    fn filter_row_lists_levels_and_term() {
        let mut app = test_app();
        app.checklist.set_term("agu");
        app.checklist.toggle_level(1);
        let out = render_to_string(TERM_W, 3, |frame, area| {
            render_header(frame, &app, area);
        });
        let second = out.lines().nth(1).unwrap();
        assert!(second.contains("/agu"));
        assert!(second.contains("1:I"));
        assert!(second.contains("2:R"));
        assert!(second.contains("3:C"));
        // Agumon plus its root
        assert!(second.contains("2 shown"));
    }
}
