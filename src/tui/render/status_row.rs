use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

const NAVIGATE_HINT: &str = "space toggle  / search  v view  e export  i import  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => match app.status_message {
            Some(ref msg) => {
                let color = if msg.starts_with("error") || msg.starts_with("Invalid") {
                    app.theme.red
                } else {
                    app.theme.yellow
                };
                (
                    vec![Span::styled(
                        format!(" {}", msg),
                        Style::default().fg(color).bg(bg),
                    )],
                    "",
                )
            }
            None => (Vec::new(), NAVIGATE_HINT),
        },
        Mode::Search => (
            vec![
                Span::styled(
                    format!("/{}", app.checklist.term()),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
            ],
            "Enter keep  Esc cancel",
        ),
        Mode::ImportPrompt => (
            vec![
                Span::styled(
                    format!("Import file: {}", app.prompt_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ],
            "Enter import  Esc cancel",
        ),
    };

    let content_width: usize = spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum();
    let hint_width = unicode::display_width(hint);
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_support::test_app;
    use crate::tui::render::test_helpers::{TERM_W, render_to_string};

    #[test]
    fn navigate_shows_hints_or_message() {
        let mut app = test_app();
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(out.contains("space toggle"));

        app.status_message = Some("Imported 3 checked items.".into());
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(out, " Imported 3 checked items.");
    }

    #[test]
    fn prompts_show_their_buffers() {
        let mut app = test_app();
        app.mode = Mode::ImportPrompt;
        app.prompt_input = "snap.json".into();
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(out.starts_with("Import file: snap.json\u{258C}"));
        assert!(out.ends_with("Esc cancel"));

        app.mode = Mode::Search;
        app.checklist.set_term("gre");
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(out.starts_with("/gre\u{258C}"));
    }
}
