use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{NewNote, Note, UNTITLED_NOTE};
use crate::handlers::protected::utils::{parse_document, parse_uuid, validate_name};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NoteCard;

#[derive(Debug, Deserialize)]
pub struct CreateNoteBody {
    pub title: Option<String>,
    /// Editor JSON, either `{"type":"doc",...}` or an array of blocks
    pub content: Option<Value>,
}

/// GET /api/notebooks/:id/notes - Note cards, most recently edited first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<NoteCard>> {
    let notebook_id = parse_uuid("id", &id)?;
    let notes = state
        .store
        .get_notes_by_notebook(user.user_id, notebook_id)
        .await?;
    let preview_length = state.config.document.preview_length;
    Ok(ApiResponse::success(
        notes.iter().map(|note| NoteCard::new(note, preview_length)).collect(),
    ))
}

/// POST /api/notebooks/:id/notes - Create a note
///
/// A missing title becomes "Untitled Note"; content is optional and is
/// validated like any other save.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<CreateNoteBody>, JsonRejection>,
) -> ApiResult<Note> {
    let notebook_id = parse_uuid("id", &id)?;
    let Json(body) = payload?;

    let title = match body.title.as_deref() {
        None => UNTITLED_NOTE.to_string(),
        Some(title) => validate_name("title", Some(title))?,
    };
    let content = body
        .content
        .map(|value| parse_document(value, &state.validation_options()))
        .transpose()?;

    let note = state
        .store
        .create_note(
            user.user_id,
            NewNote {
                notebook_id,
                title,
                content,
            },
        )
        .await?;
    tracing::info!(note_id = %note.id, %notebook_id, "Note created");
    Ok(ApiResponse::created(note))
}
