use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::note::Note;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notebook {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Title-only view of a note, used for navigation and counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NoteSummary {
    pub id: Uuid,
    pub notebook_id: Uuid,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

/// A notebook with the titles of its notes (dashboard and sidebar)
#[derive(Debug, Clone, Serialize)]
pub struct NotebookWithNotes {
    #[serde(flatten)]
    pub notebook: Notebook,
    pub notes: Vec<NoteSummary>,
}

/// A notebook with its full notes (notebook page)
#[derive(Debug, Clone, Serialize)]
pub struct NotebookDetail {
    #[serde(flatten)]
    pub notebook: Notebook,
    pub notes: Vec<Note>,
}
