pub mod record;
pub mod table;
pub mod undo;
pub mod version;
