use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Any key dismisses the last notice
    app.status_message = None;

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }

        // Movement
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::PageDown) => app.move_cursor(10),
        (_, KeyCode::PageUp) => app.move_cursor(-10),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => app.move_cursor(isize::MAX / 2),

        // Checkboxes
        (_, KeyCode::Char(' ')) | (_, KeyCode::Enter) => app.activate_current(),
        (_, KeyCode::Char('A')) => app.set_all(true),
        (_, KeyCode::Char('U')) => app.set_all(false),
        (_, KeyCode::Char('C')) => app.clear_state(),

        // Filter
        (_, KeyCode::Char('/')) => {
            app.search_backup = app.checklist.term().to_string();
            app.mode = Mode::Search;
        }
        (_, KeyCode::Esc) => {
            if !app.checklist.term().is_empty() {
                app.checklist.set_term("");
                app.clamp_cursor();
            }
        }
        (_, KeyCode::Char(c @ '1'..='9')) => {
            let idx = c as usize - '1' as usize;
            app.checklist.toggle_level(idx);
            app.clamp_cursor();
        }

        // View and sections
        (_, KeyCode::Char('v')) => app.toggle_view(),
        (_, KeyCode::Char('z')) => app.toggle_current_section(),
        (_, KeyCode::Char('Z')) => {
            app.checklist.expand_all();
            app.clamp_cursor();
        }
        (_, KeyCode::Char('X')) => {
            app.checklist.collapse_all();
            app.clamp_cursor();
        }

        // Snapshots
        (_, KeyCode::Char('e')) => app.export(),
        (_, KeyCode::Char('i')) => {
            app.prompt_input.clear();
            app.mode = Mode::ImportPrompt;
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::model::state::ViewMode;
    use crate::tui::app::test_support::test_app;
    use crate::tui::app::{FlatItem, Mode};
    use crate::tui::input::handle_key;

    fn press(app: &mut crate::tui::app::App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn space_checks_the_node_under_cursor() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert!(app.checklist.state().get("#002"));
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.checklist.state().get("#002"));
        assert!(app.checklist.state().contains("#002"));
    }

    #[test]
    fn check_all_then_uncheck_all() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('A'));
        assert_eq!(app.checklist.count().checked, 6);
        press(&mut app, KeyCode::Char('U'));
        assert_eq!(app.checklist.count().checked, 0);
    }

    #[test]
    fn clear_forgets_saved_checks() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('A'));
        press(&mut app, KeyCode::Char('C'));
        assert!(app.checklist.state().is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Cleared saved checks."));
    }

    #[test]
    fn v_flips_view() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.checklist.view_mode(), ViewMode::ById);
        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.checklist.view_mode(), ViewMode::ByLines);
    }

    #[test]
    fn digit_toggles_level_filter() {
        let mut app = test_app();
        // Levels in first-seen order: I, R, C
        press(&mut app, KeyCode::Char('2'));
        assert!(app.checklist.levels()[1].active);
        let items = app.build_flat_items();
        // Two line sections survive, each with its root (ancestor) and rookie
        assert_eq!(items.len(), 6);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.build_flat_items().len(), 9);
    }

    #[test]
    fn collapse_and_expand_all() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('X'));
        assert_eq!(app.build_flat_items().len(), 3);
        press(&mut app, KeyCode::Char('Z'));
        assert_eq!(app.build_flat_items().len(), 9);
    }

    #[test]
    fn z_collapses_current_section() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.current_item(), Some(FlatItem::Section { section: 0 }));
        assert!(app.checklist.tree().sections[0].collapsed);
    }

    #[test]
    fn slash_enters_search_and_i_enters_prompt() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.mode, Mode::ImportPrompt);
    }

    #[test]
    fn q_quits() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
