use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    NewNote, Note, NoteChanges, NoteWithNotebook, Notebook, NotebookDetail, NotebookWithNotes,
};

/// Notebook and note persistence, scoped to the owning user.
///
/// Rows that exist but belong to another user are reported as
/// [`DatabaseError::NotFound`], exactly like rows that do not exist.
/// Notebooks are listed by creation time (oldest first), notes by last
/// update (newest first). Every write bumps `updated_at` on the written row.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Cheap connectivity check for `/health`
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn get_notebooks(&self, user_id: Uuid) -> Result<Vec<NotebookWithNotes>, DatabaseError>;

    async fn get_notebook_by_id(
        &self,
        user_id: Uuid,
        notebook_id: Uuid,
    ) -> Result<NotebookDetail, DatabaseError>;

    async fn create_notebook(&self, user_id: Uuid, name: &str) -> Result<Notebook, DatabaseError>;

    async fn update_notebook(
        &self,
        user_id: Uuid,
        notebook_id: Uuid,
        name: &str,
    ) -> Result<Notebook, DatabaseError>;

    /// Removes the notebook and every note in it
    async fn delete_notebook(&self, user_id: Uuid, notebook_id: Uuid) -> Result<(), DatabaseError>;

    async fn create_note(&self, user_id: Uuid, note: NewNote) -> Result<Note, DatabaseError>;

    async fn get_notes_by_notebook(
        &self,
        user_id: Uuid,
        notebook_id: Uuid,
    ) -> Result<Vec<Note>, DatabaseError>;

    async fn get_note_by_id(&self, user_id: Uuid, note_id: Uuid) -> Result<NoteWithNotebook, DatabaseError>;

    /// Applies only the fields set in `changes`; content is stored in object form
    async fn update_note(
        &self,
        user_id: Uuid,
        note_id: Uuid,
        changes: NoteChanges,
    ) -> Result<Note, DatabaseError>;

    async fn delete_note(&self, user_id: Uuid, note_id: Uuid) -> Result<(), DatabaseError>;
}
