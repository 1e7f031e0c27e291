pub mod config;
pub mod project;
pub mod snapshot;
pub mod state;
pub mod tree;

pub use config::*;
pub use project::*;
pub use snapshot::*;
pub use state::*;
pub use tree::*;
