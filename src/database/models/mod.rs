pub mod note;
pub mod notebook;

pub use note::{NewNote, Note, NoteChanges, NoteWithNotebook, NotebookRef, UNTITLED_NOTE};
pub use notebook::{Notebook, NotebookDetail, NotebookWithNotes, NoteSummary};
