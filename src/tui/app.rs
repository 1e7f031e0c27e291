use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::checklist::Checklist;
use crate::io::file_access::{DirDownload, FsFileSource};
use crate::io::project_io::{self, discover_project, load_project};
use crate::model::state::ViewMode;
use crate::model::tree::{Node, WidgetId};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Editing the search term; every keystroke refilters
    Search,
    /// Typing the path of a snapshot to import
    ImportPrompt,
}

/// One selectable row of the content pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatItem {
    /// A section header in the by-lines view
    Section { section: usize },
    /// A node inside a by-lines section
    LineNode { section: usize, node: usize },
    /// A row of the by-ID view
    IdRow { row: usize },
}

/// Main application state
pub struct App {
    pub checklist: Checklist,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the flat visible items list
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    /// Search term before entering search mode, restored on Esc
    pub search_backup: String,
    /// Prompt buffer for the import path
    pub prompt_input: String,
    /// Where exports are written
    pub export_dir: PathBuf,
    /// One-line notice shown in the status row
    pub status_message: Option<String>,
}

impl App {
    pub fn new(checklist: Checklist, export_dir: PathBuf) -> Self {
        App {
            checklist,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::default(),
            cursor: 0,
            scroll_offset: 0,
            search_backup: String::new(),
            prompt_input: String::new(),
            export_dir,
            status_message: None,
        }
    }

    /// Visible rows of the active view, skipping filtered nodes and the
    /// bodies of collapsed sections
    pub fn build_flat_items(&self) -> Vec<FlatItem> {
        let tree = self.checklist.tree();
        let mut items = Vec::new();
        match self.checklist.view_mode() {
            ViewMode::ByLines => {
                for (si, section) in tree.sections.iter().enumerate() {
                    if section.hidden {
                        continue;
                    }
                    items.push(FlatItem::Section { section: si });
                    if section.collapsed {
                        continue;
                    }
                    for (ni, node) in section.nodes.iter().enumerate() {
                        if !node.hidden {
                            items.push(FlatItem::LineNode {
                                section: si,
                                node: ni,
                            });
                        }
                    }
                }
            }
            ViewMode::ById => {
                for (ri, row) in tree.id_rows.iter().enumerate() {
                    if !row.hidden {
                        items.push(FlatItem::IdRow { row: ri });
                    }
                }
            }
        }
        items
    }

    pub fn node_for(&self, item: &FlatItem) -> Option<&Node> {
        let tree = self.checklist.tree();
        match *item {
            FlatItem::Section { .. } => None,
            FlatItem::LineNode { section, node } => {
                tree.sections.get(section).and_then(|s| s.nodes.get(node))
            }
            FlatItem::IdRow { row } => tree.id_rows.get(row),
        }
    }

    pub fn current_item(&self) -> Option<FlatItem> {
        self.build_flat_items().get(self.cursor).cloned()
    }

    /// Keep the cursor inside the current item list
    pub fn clamp_cursor(&mut self) {
        let len = self.build_flat_items().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.build_flat_items().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    /// Space on a node toggles its checkbox; on a section header it
    /// collapses or expands the section.
    pub fn activate_current(&mut self) {
        let Some(item) = self.current_item() else {
            return;
        };
        match item {
            FlatItem::Section { section } => {
                let id = self.checklist.tree().sections[section].id.clone();
                self.checklist.toggle_root(&id);
            }
            _ => {
                let Some(widget) = self.node_for(&item).map(|n| n.widget) else {
                    return;
                };
                self.toggle_widget(widget);
            }
        }
        self.clamp_cursor();
    }

    fn toggle_widget(&mut self, widget: WidgetId) {
        if let Err(e) = self.checklist.toggle_widget(widget) {
            self.status_message = Some(format!("error: {}", e));
        }
    }

    /// Collapse or expand the section under the cursor
    pub fn toggle_current_section(&mut self) {
        let section = match self.current_item() {
            Some(FlatItem::Section { section }) | Some(FlatItem::LineNode { section, .. }) => {
                section
            }
            _ => return,
        };
        let id = self.checklist.tree().sections[section].id.clone();
        self.checklist.toggle_root(&id);
        // Land on the header so the cursor does not vanish into the body
        if let Some(pos) = self
            .build_flat_items()
            .iter()
            .position(|i| *i == FlatItem::Section { section })
        {
            self.cursor = pos;
        }
    }

    pub fn set_all(&mut self, value: bool) {
        if let Err(e) = self.checklist.set_all(value) {
            self.status_message = Some(format!("error: {}", e));
        }
    }

    pub fn clear_state(&mut self) {
        match self.checklist.clear_state() {
            Ok(()) => self.status_message = Some("Cleared saved checks.".to_string()),
            Err(e) => self.status_message = Some(format!("error: {}", e)),
        }
    }

    pub fn toggle_view(&mut self) {
        if let Err(e) = self.checklist.toggle_view() {
            self.status_message = Some(format!("error: {}", e));
        }
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    pub fn export(&mut self) {
        let download = DirDownload::new(&self.export_dir);
        self.status_message = Some(match self.checklist.export(&download) {
            Ok(report) => format!("Exported to {}", report.location),
            Err(e) => format!("error: {}", e),
        });
    }

    pub fn import_from(&mut self, path: &str) {
        self.status_message = Some(match self.checklist.import_file(&FsFileSource, path) {
            Ok(report) => report.message(),
            Err(e) => e.to_string(),
        });
        self.clamp_cursor();
    }
}

/// Run the TUI application
pub fn run(project_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    // Discover and load project
    let start = match project_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let root = discover_project(&start)?;
    let project = load_project(&root)?;
    let storage = project_io::open_storage(&project);
    let export_dir = project.root.clone();

    let mut app = App::new(Checklist::open(project, Box::new(storage)), export_dir);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::io::state_store::StateStore;
    use crate::io::storage::MemoryStorage;
    use crate::model::config::StorageKeys;
    use crate::parse::{OutlineOptions, parse_outline};

    pub const OUTLINE: &str = "\
Koromon (I) #002
  Agumon (R) #005
    Greymon (C) #010

Tsunomon (I) #003
  Gabumon (R) #006

The following Digimon have no evolution line
Mystery Egg
";

    pub fn test_app() -> App {
        let opts = OutlineOptions {
            standalone_marker: "The following Digimon have no evolution line".into(),
            indent_step: 0,
        };
        let tree = parse_outline(OUTLINE, &opts);
        let keys = StorageKeys {
            state_key: "t_evo_checklist".into(),
            view_key: "t_viewmode".into(),
            export_prefix: "t".into(),
        };
        let store = StateStore::new(Box::new(MemoryStorage::new()), keys);
        let levels = tree.levels();
        App::new(
            Checklist::new("Test", tree, store, levels),
            std::env::temp_dir(),
        )
    }
}
