//! checktree: a persistent checklist over an indented outline of
//! evolution lines, with a terminal UI and a scriptable CLI.

pub mod checklist;
pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
pub mod tui;
pub mod util;
