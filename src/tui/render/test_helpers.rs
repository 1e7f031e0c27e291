use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_support::test_app;
    use crate::tui::render::render;

    #[test]
    fn full_screen_render() {
        let mut app = test_app();
        let out = render_to_string(TERM_W, TERM_H, |frame, _area| {
            render(frame, &mut app);
        });
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("View: by Lines"));
        assert!(lines[1].contains("/ search"));
        assert!(lines[2].starts_with("\u{2500}\u{2500}"));
        assert!(lines[3].contains("Koromon #002"));
        assert!(lines.last().unwrap().contains("q quit"));
    }
}
