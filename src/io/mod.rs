pub mod file_access;
pub mod project_io;
pub mod state_store;
pub mod storage;
