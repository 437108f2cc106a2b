pub mod collection;
pub mod notebook;
pub mod notes;

// Re-export handler functions for use in routing
pub use collection::{create as notebooks_post, list as notebooks_get};
pub use notebook::{delete as notebook_delete, get as notebook_get, patch as notebook_patch};
pub use notes::{create as notebook_notes_post, list as notebook_notes_get};
