pub mod undo;
pub mod version;
