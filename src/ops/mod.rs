pub mod filter;
pub mod key_index;
pub mod snapshot;
pub mod sync;
pub mod view_mode;
