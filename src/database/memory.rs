use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    NewNote, Note, NoteChanges, NoteSummary, NoteWithNotebook, Notebook, NotebookDetail,
    NotebookRef, NotebookWithNotes,
};
use super::store::NoteStore;

/// In-process store with the same ownership and ordering rules as PostgreSQL
#[derive(Default)]
pub struct MemoryNoteStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    notebooks: HashMap<Uuid, Notebook>,
    notes: HashMap<Uuid, Note>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl State {
    /// Microsecond clock that never repeats, so ordering by timestamp is total
    fn now(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let now = now
            .duration_trunc(Duration::microseconds(1))
            .unwrap_or(now);
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }

    fn owned_notebook(&self, user_id: Uuid, notebook_id: Uuid) -> Result<&Notebook, DatabaseError> {
        self.notebooks
            .get(&notebook_id)
            .filter(|notebook| notebook.user_id == user_id)
            .ok_or_else(DatabaseError::notebook_not_found)
    }

    fn owns_note(&self, user_id: Uuid, note: &Note) -> bool {
        self.notebooks
            .get(&note.notebook_id)
            .is_some_and(|notebook| notebook.user_id == user_id)
    }

    fn notes_in(&self, notebook_id: Uuid) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .notes
            .values()
            .filter(|note| note.notebook_id == notebook_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        notes
    }
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn get_notebooks(&self, user_id: Uuid) -> Result<Vec<NotebookWithNotes>, DatabaseError> {
        let state = self.state.read().await;
        let mut notebooks: Vec<&Notebook> = state
            .notebooks
            .values()
            .filter(|notebook| notebook.user_id == user_id)
            .collect();
        notebooks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(notebooks
            .into_iter()
            .map(|notebook| NotebookWithNotes {
                notebook: notebook.clone(),
                notes: state
                    .notes_in(notebook.id)
                    .into_iter()
                    .map(|note| NoteSummary {
                        id: note.id,
                        notebook_id: note.notebook_id,
                        title: note.title,
                        updated_at: note.updated_at,
                    })
                    .collect(),
            })
            .collect())
    }

    async fn get_notebook_by_id(
        &self,
        user_id: Uuid,
        notebook_id: Uuid,
    ) -> Result<NotebookDetail, DatabaseError> {
        let state = self.state.read().await;
        let notebook = state.owned_notebook(user_id, notebook_id)?.clone();
        let notes = state.notes_in(notebook_id);
        Ok(NotebookDetail { notebook, notes })
    }

    async fn create_notebook(&self, user_id: Uuid, name: &str) -> Result<Notebook, DatabaseError> {
        let mut state = self.state.write().await;
        let now = state.now();
        let notebook = Notebook {
            id: Uuid::new_v4(),
            name: name.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        state.notebooks.insert(notebook.id, notebook.clone());
        Ok(notebook)
    }

    async fn update_notebook(
        &self,
        user_id: Uuid,
        notebook_id: Uuid,
        name: &str,
    ) -> Result<Notebook, DatabaseError> {
        let mut state = self.state.write().await;
        state.owned_notebook(user_id, notebook_id)?;
        let now = state.now();
        let notebook = state
            .notebooks
            .get_mut(&notebook_id)
            .ok_or_else(DatabaseError::notebook_not_found)?;
        notebook.name = name.to_string();
        notebook.updated_at = now;
        Ok(notebook.clone())
    }

    async fn delete_notebook(&self, user_id: Uuid, notebook_id: Uuid) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        state.owned_notebook(user_id, notebook_id)?;
        state.notebooks.remove(&notebook_id);
        state.notes.retain(|_, note| note.notebook_id != notebook_id);
        Ok(())
    }

    async fn create_note(&self, user_id: Uuid, note: NewNote) -> Result<Note, DatabaseError> {
        let mut state = self.state.write().await;
        state.owned_notebook(user_id, note.notebook_id)?;
        let now = state.now();
        let note = Note {
            id: Uuid::new_v4(),
            notebook_id: note.notebook_id,
            title: note.title,
            content: note.content.map(|doc| doc.to_value()),
            created_at: now,
            updated_at: now,
        };
        state.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn get_notes_by_notebook(
        &self,
        user_id: Uuid,
        notebook_id: Uuid,
    ) -> Result<Vec<Note>, DatabaseError> {
        let state = self.state.read().await;
        state.owned_notebook(user_id, notebook_id)?;
        Ok(state.notes_in(notebook_id))
    }

    async fn get_note_by_id(&self, user_id: Uuid, note_id: Uuid) -> Result<NoteWithNotebook, DatabaseError> {
        let state = self.state.read().await;
        let note = state
            .notes
            .get(&note_id)
            .filter(|note| state.owns_note(user_id, note))
            .ok_or_else(DatabaseError::note_not_found)?;
        let notebook = state.owned_notebook(user_id, note.notebook_id)?;
        Ok(NoteWithNotebook {
            note: note.clone(),
            notebook: NotebookRef {
                id: notebook.id,
                name: notebook.name.clone(),
            },
        })
    }

    async fn update_note(
        &self,
        user_id: Uuid,
        note_id: Uuid,
        changes: NoteChanges,
    ) -> Result<Note, DatabaseError> {
        let mut state = self.state.write().await;
        let owned = state
            .notes
            .get(&note_id)
            .is_some_and(|note| state.owns_note(user_id, note));
        if !owned {
            return Err(DatabaseError::note_not_found());
        }
        let now = state.now();
        let note = state
            .notes
            .get_mut(&note_id)
            .ok_or_else(DatabaseError::note_not_found)?;
        if let Some(title) = changes.title {
            note.title = title;
        }
        if let Some(content) = changes.content {
            note.content = Some(content.to_value());
        }
        note.updated_at = now;
        Ok(note.clone())
    }

    async fn delete_note(&self, user_id: Uuid, note_id: Uuid) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        let owned = state
            .notes
            .get(&note_id)
            .is_some_and(|note| state.owns_note(user_id, note));
        if !owned {
            return Err(DatabaseError::note_not_found());
        }
        state.notes.remove(&note_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use serde_json::json;

    fn new_note(notebook_id: Uuid, title: &str) -> NewNote {
        NewNote {
            notebook_id,
            title: title.to_string(),
            content: None,
        }
    }

    #[tokio::test]
    async fn notebooks_are_listed_oldest_first_with_newest_notes_first() {
        let store = MemoryNoteStore::new();
        let user = Uuid::new_v4();
        let first = store.create_notebook(user, "First").await.unwrap();
        let second = store.create_notebook(user, "Second").await.unwrap();
        let older = store.create_note(user, new_note(first.id, "Older")).await.unwrap();
        let newer = store.create_note(user, new_note(first.id, "Newer")).await.unwrap();

        let listed = store.get_notebooks(user).await.unwrap();
        let names: Vec<_> = listed.iter().map(|entry| entry.notebook.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        let titles: Vec<_> = listed[0].notes.iter().map(|note| note.id).collect();
        assert_eq!(titles, vec![newer.id, older.id]);
        assert!(listed[1].notes.is_empty());
        assert_eq!(listed[1].notebook.id, second.id);

        // editing the older note moves it to the top
        store
            .update_note(user, older.id, NoteChanges { title: Some("Edited".into()), content: None })
            .await
            .unwrap();
        let notes = store.get_notes_by_notebook(user, first.id).await.unwrap();
        assert_eq!(notes[0].id, older.id);
        assert_eq!(notes[0].title, "Edited");
    }

    #[tokio::test]
    async fn other_users_see_not_found() {
        let store = MemoryNoteStore::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let notebook = store.create_notebook(owner, "Private").await.unwrap();
        let note = store.create_note(owner, new_note(notebook.id, "Secret")).await.unwrap();

        assert!(store.get_notebooks(intruder).await.unwrap().is_empty());
        assert!(matches!(
            store.get_notebook_by_id(intruder, notebook.id).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(matches!(
            store.update_notebook(intruder, notebook.id, "Mine").await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(matches!(
            store.create_note(intruder, new_note(notebook.id, "Planted")).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(matches!(
            store.get_note_by_id(intruder, note.id).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(matches!(
            store.update_note(intruder, note.id, NoteChanges::default()).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(matches!(store.delete_note(intruder, note.id).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(
            store.delete_notebook(intruder, notebook.id).await,
            Err(DatabaseError::NotFound(_))
        ));

        // nothing changed for the owner
        let fetched = store.get_note_by_id(owner, note.id).await.unwrap();
        assert_eq!(fetched.note.title, "Secret");
        assert_eq!(fetched.notebook.name, "Private");
    }

    #[tokio::test]
    async fn deleting_a_notebook_deletes_its_notes() {
        let store = MemoryNoteStore::new();
        let user = Uuid::new_v4();
        let doomed = store.create_notebook(user, "Doomed").await.unwrap();
        let kept = store.create_notebook(user, "Kept").await.unwrap();
        let gone = store.create_note(user, new_note(doomed.id, "Gone")).await.unwrap();
        let stays = store.create_note(user, new_note(kept.id, "Stays")).await.unwrap();

        store.delete_notebook(user, doomed.id).await.unwrap();

        assert!(matches!(store.get_note_by_id(user, gone.id).await, Err(DatabaseError::NotFound(_))));
        assert!(store.get_note_by_id(user, stays.id).await.is_ok());
        assert_eq!(store.get_notebooks(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn content_is_stored_in_object_form_and_updates_are_partial() {
        let store = MemoryNoteStore::new();
        let user = Uuid::new_v4();
        let notebook = store.create_notebook(user, "Docs").await.unwrap();
        let note = store.create_note(user, new_note(notebook.id, "Draft")).await.unwrap();
        assert_eq!(note.content, None);

        let doc = Document::from_value(json!([
            { "type": "paragraph", "content": [{ "type": "text", "text": "hello" }] }
        ]))
        .unwrap();
        let updated = store
            .update_note(user, note.id, NoteChanges { title: None, content: Some(doc) })
            .await
            .unwrap();

        assert_eq!(updated.title, "Draft");
        assert_eq!(
            updated.content,
            Some(json!({
                "type": "doc",
                "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "hello" }] }]
            }))
        );
        assert!(updated.updated_at > note.updated_at);
        assert_eq!(updated.created_at, note.created_at);
    }

    #[tokio::test]
    async fn renaming_bumps_updated_at() {
        let store = MemoryNoteStore::new();
        let user = Uuid::new_v4();
        let notebook = store.create_notebook(user, "Old").await.unwrap();
        let renamed = store.update_notebook(user, notebook.id, "New").await.unwrap();
        assert_eq!(renamed.name, "New");
        assert!(renamed.updated_at > notebook.updated_at);
    }
}
