pub mod cards;
pub mod export;

pub use cards::{content_checksum, NoteCard, NoteDetail, NotePreview, NotebookCard, NotebookPage};
pub use export::{file_name, ExportFormat, Exported};
