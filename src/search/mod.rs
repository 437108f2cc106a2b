//! Sidebar navigation: the notebook/note tree and its title filter.

mod highlight;

pub use highlight::{highlight, Segment};

use serde::Serialize;
use uuid::Uuid;

use crate::database::models::NotebookWithNotes;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavNote {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub is_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavNotebook {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub items: Vec<NavNote>,
}

pub fn notebook_url(notebook_id: Uuid) -> String {
    format!("/dashboard/notebook/{}", notebook_id)
}

pub fn note_url(notebook_id: Uuid, note_id: Uuid) -> String {
    format!("/dashboard/notebook/{}/note/{}", notebook_id, note_id)
}

/// Navigation tree in store order, nothing flagged as a match
pub fn build_navigation(notebooks: &[NotebookWithNotes]) -> Vec<NavNotebook> {
    notebooks
        .iter()
        .map(|entry| NavNotebook {
            id: entry.notebook.id,
            title: entry.notebook.name.clone(),
            url: notebook_url(entry.notebook.id),
            items: entry
                .notes
                .iter()
                .map(|note| NavNote {
                    id: note.id,
                    title: note.title.clone(),
                    url: note_url(entry.notebook.id, note.id),
                    is_match: false,
                })
                .collect(),
        })
        .collect()
}

/// Case-insensitive substring filter over notebook names and note titles.
///
/// A notebook survives when its name or any note title contains the query and
/// then keeps all of its notes, each flagged with `is_match`. A blank query
/// returns the tree unchanged with every flag cleared.
pub fn filter_navigation(nav: Vec<NavNotebook>, query: &str) -> Vec<NavNotebook> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return nav
            .into_iter()
            .map(|mut notebook| {
                notebook.items.iter_mut().for_each(|note| note.is_match = false);
                notebook
            })
            .collect();
    }

    nav.into_iter()
        .filter_map(|mut notebook| {
            let name_matches = notebook.title.to_lowercase().contains(&query);
            let mut any_note = false;
            for note in &mut notebook.items {
                note.is_match = note.title.to_lowercase().contains(&query);
                any_note |= note.is_match;
            }
            (name_matches || any_note).then_some(notebook)
        })
        .collect()
}
