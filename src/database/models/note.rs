use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::document::{Document, DocumentError};

pub const UNTITLED_NOTE: &str = "Untitled Note";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub notebook_id: Uuid,
    pub title: String,
    /// Editor JSON exactly as stored in the `content` column
    pub content: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Typed view of the stored content, `None` for a note that was never written
    pub fn document(&self) -> Result<Option<Document>, DocumentError> {
        match &self.content {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Document::from_value(value.clone()).map(Some),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookRef {
    pub id: Uuid,
    pub name: String,
}

/// A note together with the notebook it belongs to (editor page breadcrumbs)
#[derive(Debug, Clone, Serialize)]
pub struct NoteWithNotebook {
    #[serde(flatten)]
    pub note: Note,
    pub notebook: NotebookRef,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub notebook_id: Uuid,
    pub title: String,
    pub content: Option<Document>,
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<Document>,
}

impl NoteChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}
