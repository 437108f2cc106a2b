pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager, MIGRATOR};
pub use memory::MemoryNoteStore;
pub use repository::PgNoteStore;
pub use store::NoteStore;
