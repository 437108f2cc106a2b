// Read-only summaries of notebooks and notes as the dashboard shows them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::database::models::{
    Note, NoteSummary, NoteWithNotebook, Notebook, NotebookDetail, NotebookRef, NotebookWithNotes,
    UNTITLED_NOTE,
};
use crate::document::{html, text, Document, DocumentError};
use crate::search::{note_url, notebook_url};

/// Dashboard card for a notebook
#[derive(Debug, Clone, Serialize)]
pub struct NotebookCard {
    #[serde(flatten)]
    pub notebook: Notebook,
    pub url: String,
    pub note_count: usize,
    pub note_count_label: String,
    pub notes: Vec<NoteLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteLink {
    pub id: Uuid,
    pub title: String,
    pub url: String,
}

/// Note card inside a notebook page
#[derive(Debug, Clone, Serialize)]
pub struct NoteCard {
    pub id: Uuid,
    pub notebook_id: Uuid,
    pub title: String,
    pub url: String,
    pub preview: String,
    pub has_content: bool,
    pub updated_label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notebook page: the notebook and a card per note
#[derive(Debug, Clone, Serialize)]
pub struct NotebookPage {
    #[serde(flatten)]
    pub notebook: Notebook,
    pub url: String,
    pub notes: Vec<NoteCard>,
}

/// Editor payload: the stored note plus read-only extras
#[derive(Debug, Clone, Serialize)]
pub struct NoteDetail {
    #[serde(flatten)]
    pub note: Note,
    pub notebook: NotebookRef,
    pub url: String,
    pub checksum: Option<String>,
    pub word_count: usize,
    pub character_count: usize,
    pub outline: Vec<text::OutlineEntry>,
}

/// Read-only view rendered from the same document
#[derive(Debug, Clone, Serialize)]
pub struct NotePreview {
    pub id: Uuid,
    pub title: String,
    pub notebook_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub html: String,
}

pub fn display_title(title: &str) -> &str {
    if title.trim().is_empty() {
        UNTITLED_NOTE
    } else {
        title
    }
}

pub fn note_count_label(count: usize) -> String {
    format!("{} {}", count, if count == 1 { "note" } else { "notes" })
}

/// Short US-style date, e.g. `Jan 5, 2025`
pub fn date_label(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Hex SHA-256 of the stored content, `None` for a note never written
pub fn content_checksum(content: Option<&Value>) -> Option<String> {
    let content = content.filter(|value| !value.is_null())?;
    let mut hasher = Sha256::new();
    hasher.update(content.to_string().as_bytes());
    Some(format!("{:x}", hasher.finalize()))
}

impl NotebookCard {
    pub fn new(entry: NotebookWithNotes) -> Self {
        let NotebookWithNotes { notebook, notes } = entry;
        let note_count = notes.len();
        Self {
            url: notebook_url(notebook.id),
            note_count,
            note_count_label: note_count_label(note_count),
            notes: notes.into_iter().map(NoteLink::from).collect(),
            notebook,
        }
    }
}

impl From<NoteSummary> for NoteLink {
    fn from(summary: NoteSummary) -> Self {
        Self {
            id: summary.id,
            url: note_url(summary.notebook_id, summary.id),
            title: summary.title,
        }
    }
}

impl NoteCard {
    pub fn new(note: &Note, preview_length: usize) -> Self {
        let preview = text::preview_value(note.content.as_ref(), preview_length);
        let has_content = preview != text::NO_CONTENT;
        Self {
            id: note.id,
            notebook_id: note.notebook_id,
            title: display_title(&note.title).to_string(),
            url: note_url(note.notebook_id, note.id),
            preview,
            has_content,
            updated_label: date_label(&note.updated_at),
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

impl NotebookPage {
    pub fn new(detail: NotebookDetail, preview_length: usize) -> Self {
        let notes = detail
            .notes
            .iter()
            .map(|note| NoteCard::new(note, preview_length))
            .collect();
        Self {
            url: notebook_url(detail.notebook.id),
            notebook: detail.notebook,
            notes,
        }
    }
}

impl NoteDetail {
    /// Fails only when stored content no longer parses as a document
    pub fn new(entry: NoteWithNotebook) -> Result<Self, DocumentError> {
        let doc = entry.note.document()?;
        let (word_count, character_count, outline) = match &doc {
            Some(doc) => (text::word_count(doc), text::character_count(doc), text::outline(doc)),
            None => (0, 0, Vec::new()),
        };
        Ok(Self {
            url: note_url(entry.note.notebook_id, entry.note.id),
            checksum: content_checksum(entry.note.content.as_ref()),
            word_count,
            character_count,
            outline,
            note: entry.note,
            notebook: entry.notebook,
        })
    }
}

impl NotePreview {
    pub fn new(entry: &NoteWithNotebook) -> Result<Self, DocumentError> {
        let doc = entry.note.document()?.unwrap_or_else(Document::empty);
        Ok(Self {
            id: entry.note.id,
            title: display_title(&entry.note.title).to_string(),
            notebook_name: entry.notebook.name.clone(),
            created_at: entry.note.created_at,
            updated_at: entry.note.updated_at,
            html: html::to_html(&doc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn note(title: &str, content: Option<Value>) -> Note {
        let at = Utc.with_ymd_and_hms(2025, 1, 5, 9, 30, 0).unwrap();
        Note {
            id: Uuid::new_v4(),
            notebook_id: Uuid::new_v4(),
            title: title.to_string(),
            content,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn card_falls_back_for_empty_notes() {
        let card = NoteCard::new(&note("  ", None), 120);
        assert_eq!(card.title, "Untitled Note");
        assert_eq!(card.preview, "No content");
        assert!(!card.has_content);
        assert_eq!(card.updated_label, "Jan 5, 2025");
        assert_eq!(card.url, format!("/dashboard/notebook/{}/note/{}", card.notebook_id, card.id));
    }

    #[test]
    fn card_truncates_long_text() {
        let long = "word ".repeat(40);
        let card = NoteCard::new(
            &note("Long", Some(json!({ "type": "doc", "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": long }] }
            ]}))),
            120,
        );
        assert!(card.has_content);
        assert_eq!(card.preview.chars().count(), 123);
        assert!(card.preview.ends_with("..."));
    }

    #[test]
    fn notebook_card_counts_notes() {
        let at = Utc::now();
        let notebook = Notebook {
            id: Uuid::new_v4(),
            name: "Ideas".into(),
            user_id: Uuid::new_v4(),
            created_at: at,
            updated_at: at,
        };
        let notes = vec![NoteSummary {
            id: Uuid::new_v4(),
            notebook_id: notebook.id,
            title: "One".into(),
            updated_at: at,
        }];
        let card = NotebookCard::new(NotebookWithNotes { notebook, notes });
        assert_eq!(card.note_count, 1);
        assert_eq!(card.note_count_label, "1 note");
        assert_eq!(note_count_label(0), "0 notes");

        let body = serde_json::to_value(&card).unwrap();
        assert_eq!(body["name"], "Ideas");
        assert_eq!(body["notes"][0]["title"], "One");
    }

    #[test]
    fn detail_reports_counts_and_checksum() {
        let entry = NoteWithNotebook {
            note: note("Doc", Some(Document::welcome().to_value())),
            notebook: NotebookRef { id: Uuid::new_v4(), name: "Guides".into() },
        };
        let detail = NoteDetail::new(entry).unwrap();
        assert!(detail.word_count > 10);
        assert_eq!(detail.outline[0].level, 1);
        assert_eq!(detail.checksum.as_ref().map(String::len), Some(64));

        let empty = NoteDetail::new(NoteWithNotebook {
            note: note("Empty", None),
            notebook: NotebookRef { id: Uuid::new_v4(), name: "Guides".into() },
        })
        .unwrap();
        assert_eq!(empty.checksum, None);
        assert_eq!(empty.word_count, 0);
    }

    #[test]
    fn preview_renders_html() {
        let entry = NoteWithNotebook {
            note: note("", Some(json!([{ "type": "paragraph", "content": [{ "type": "text", "text": "hi" }] }]))),
            notebook: NotebookRef { id: Uuid::new_v4(), name: "Inbox".into() },
        };
        let preview = NotePreview::new(&entry).unwrap();
        assert_eq!(preview.title, "Untitled Note");
        assert_eq!(preview.notebook_name, "Inbox");
        assert_eq!(preview.html, "<p>hi</p>");
    }
}
