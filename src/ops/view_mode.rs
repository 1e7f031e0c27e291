use crate::model::state::ViewMode;

/// Visibility of the two view containers. Exactly one is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewContainers {
    pub by_lines_hidden: bool,
    pub by_id_hidden: bool,
}

impl ViewContainers {
    pub fn for_mode(mode: ViewMode) -> Self {
        let by_id = mode == ViewMode::ById;
        ViewContainers {
            by_lines_hidden: by_id,
            by_id_hidden: !by_id,
        }
    }

    /// The mode whose container is showing
    pub fn shown(&self) -> ViewMode {
        if self.by_id_hidden {
            ViewMode::ByLines
        } else {
            ViewMode::ById
        }
    }
}

impl Default for ViewContainers {
    fn default() -> Self {
        ViewContainers::for_mode(ViewMode::default())
    }
}

/// Resolve a user-facing `view` argument against the current mode.
/// `toggle` flips; anything else must be a mode token.
pub fn resolve_target(current: ViewMode, arg: &str) -> Option<ViewMode> {
    match arg.trim() {
        "toggle" => Some(current.toggled()),
        other => ViewMode::from_token(other),
    }
}
