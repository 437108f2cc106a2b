use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{
    NewNote, Note, NoteChanges, NoteSummary, NoteWithNotebook, Notebook, NotebookDetail,
    NotebookRef, NotebookWithNotes,
};
use super::store::NoteStore;

const NOTEBOOK_COLUMNS: &str = "id, name, user_id, created_at, updated_at";
const NOTE_COLUMNS: &str = "n.id, n.notebook_id, n.title, n.content, n.created_at, n.updated_at";

/// PostgreSQL-backed store; note content lives in a JSONB column
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

/// Note row joined with the name of its notebook
#[derive(FromRow)]
struct NoteRow {
    id: Uuid,
    notebook_id: Uuid,
    title: String,
    content: Option<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    notebook_name: String,
}

impl PgNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn owned_notebook(&self, user_id: Uuid, notebook_id: Uuid) -> Result<Notebook, DatabaseError> {
        let query = format!(
            "SELECT {} FROM notebooks WHERE id = $1 AND user_id = $2",
            NOTEBOOK_COLUMNS
        );
        sqlx::query_as::<_, Notebook>(&query)
            .bind(notebook_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(DatabaseError::notebook_not_found)
    }

    async fn notes_in(&self, user_id: Uuid, notebook_id: Uuid) -> Result<Vec<Note>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM notes n JOIN notebooks b ON b.id = n.notebook_id \
             WHERE n.notebook_id = $1 AND b.user_id = $2 \
             ORDER BY n.updated_at DESC, n.id",
            NOTE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Note>(&query)
            .bind(notebook_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn get_notebooks(&self, user_id: Uuid) -> Result<Vec<NotebookWithNotes>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM notebooks WHERE user_id = $1 ORDER BY created_at ASC, id",
            NOTEBOOK_COLUMNS
        );
        let notebooks = sqlx::query_as::<_, Notebook>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        if notebooks.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = notebooks.iter().map(|notebook| notebook.id).collect();
        let summaries = sqlx::query_as::<_, NoteSummary>(
            "SELECT id, notebook_id, title, updated_at FROM notes \
             WHERE notebook_id = ANY($1) ORDER BY updated_at DESC, id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_notebook: HashMap<Uuid, Vec<NoteSummary>> = HashMap::new();
        for summary in summaries {
            by_notebook.entry(summary.notebook_id).or_default().push(summary);
        }

        Ok(notebooks
            .into_iter()
            .map(|notebook| {
                let notes = by_notebook.remove(&notebook.id).unwrap_or_default();
                NotebookWithNotes { notebook, notes }
            })
            .collect())
    }

    async fn get_notebook_by_id(
        &self,
        user_id: Uuid,
        notebook_id: Uuid,
    ) -> Result<NotebookDetail, DatabaseError> {
        let notebook = self.owned_notebook(user_id, notebook_id).await?;
        let notes = self.notes_in(user_id, notebook_id).await?;
        Ok(NotebookDetail { notebook, notes })
    }

    async fn create_notebook(&self, user_id: Uuid, name: &str) -> Result<Notebook, DatabaseError> {
        let query = format!(
            "INSERT INTO notebooks (id, name, user_id) VALUES ($1, $2, $3) RETURNING {}",
            NOTEBOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Notebook>(&query)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_notebook(
        &self,
        user_id: Uuid,
        notebook_id: Uuid,
        name: &str,
    ) -> Result<Notebook, DatabaseError> {
        let query = format!(
            "UPDATE notebooks SET name = $3, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {}",
            NOTEBOOK_COLUMNS
        );
        sqlx::query_as::<_, Notebook>(&query)
            .bind(notebook_id)
            .bind(user_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(DatabaseError::notebook_not_found)
    }

    async fn delete_notebook(&self, user_id: Uuid, notebook_id: Uuid) -> Result<(), DatabaseError> {
        // notes go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM notebooks WHERE id = $1 AND user_id = $2")
            .bind(notebook_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::notebook_not_found());
        }
        Ok(())
    }

    async fn create_note(&self, user_id: Uuid, note: NewNote) -> Result<Note, DatabaseError> {
        let query = format!(
            "INSERT INTO notes AS n (id, notebook_id, title, content) \
             SELECT $1, b.id, $3, $4 FROM notebooks b WHERE b.id = $2 AND b.user_id = $5 \
             RETURNING {}",
            NOTE_COLUMNS
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(Uuid::new_v4())
            .bind(note.notebook_id)
            .bind(&note.title)
            .bind(note.content.map(|doc| doc.to_value()))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(DatabaseError::notebook_not_found)
    }

    async fn get_notes_by_notebook(
        &self,
        user_id: Uuid,
        notebook_id: Uuid,
    ) -> Result<Vec<Note>, DatabaseError> {
        self.owned_notebook(user_id, notebook_id).await?;
        self.notes_in(user_id, notebook_id).await
    }

    async fn get_note_by_id(&self, user_id: Uuid, note_id: Uuid) -> Result<NoteWithNotebook, DatabaseError> {
        let query = format!(
            "SELECT {}, b.name AS notebook_name FROM notes n \
             JOIN notebooks b ON b.id = n.notebook_id \
             WHERE n.id = $1 AND b.user_id = $2",
            NOTE_COLUMNS
        );
        let row = sqlx::query_as::<_, NoteRow>(&query)
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(DatabaseError::note_not_found)?;

        Ok(NoteWithNotebook {
            notebook: NotebookRef {
                id: row.notebook_id,
                name: row.notebook_name,
            },
            note: Note {
                id: row.id,
                notebook_id: row.notebook_id,
                title: row.title,
                content: row.content,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        })
    }

    async fn update_note(
        &self,
        user_id: Uuid,
        note_id: Uuid,
        changes: NoteChanges,
    ) -> Result<Note, DatabaseError> {
        let query = format!(
            "UPDATE notes AS n SET \
                title = COALESCE($3, n.title), \
                content = COALESCE($4, n.content), \
                updated_at = now() \
             FROM notebooks b \
             WHERE n.id = $1 AND b.id = n.notebook_id AND b.user_id = $2 \
             RETURNING {}",
            NOTE_COLUMNS
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(note_id)
            .bind(user_id)
            .bind(changes.title)
            .bind(changes.content.map(|doc| doc.to_value()))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(DatabaseError::note_not_found)
    }

    async fn delete_note(&self, user_id: Uuid, note_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM notes n USING notebooks b \
             WHERE n.id = $1 AND b.id = n.notebook_id AND b.user_id = $2",
        )
        .bind(note_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::note_not_found());
        }
        Ok(())
    }
}
