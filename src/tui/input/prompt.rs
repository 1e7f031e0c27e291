use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode::pop_grapheme;

/// Search mode edits the filter term in place, refiltering per keystroke.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel: restore the term from before `/`
        (_, KeyCode::Esc) => {
            let backup = std::mem::take(&mut app.search_backup);
            app.checklist.set_term(&backup);
            app.mode = Mode::Navigate;
        }
        // Keep the term
        (_, KeyCode::Enter) => {
            app.search_backup.clear();
            app.mode = Mode::Navigate;
        }
        (_, KeyCode::Backspace) => {
            let mut term = app.checklist.term().to_string();
            pop_grapheme(&mut term);
            app.checklist.set_term(&term);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            app.checklist.set_term("");
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            let mut term = app.checklist.term().to_string();
            term.push(c);
            app.checklist.set_term(&term);
        }
        _ => return,
    }
    app.cursor = 0;
    app.scroll_offset = 0;
}

/// Import prompt: type a path, Enter imports it, Esc cancels.
pub(super) fn handle_import_prompt(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.prompt_input.clear();
            app.mode = Mode::Navigate;
        }
        (_, KeyCode::Enter) => {
            let path = std::mem::take(&mut app.prompt_input);
            app.mode = Mode::Navigate;
            if !path.trim().is_empty() {
                app.import_from(path.trim());
            }
        }
        (_, KeyCode::Backspace) => pop_grapheme(&mut app.prompt_input),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.prompt_input.clear(),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.prompt_input.push(c);
        }
        _ => {}
    }
}
