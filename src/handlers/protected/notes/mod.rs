pub mod export;
pub mod note;
pub mod preview;

// Re-export handler functions for use in routing
pub use export::export as note_export;
pub use note::{delete as note_delete, get as note_get, patch as note_patch};
pub use preview::preview as note_preview;
