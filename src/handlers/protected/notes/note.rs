use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{Note, NoteChanges};
use crate::error::ApiError;
use crate::handlers::protected::utils::{parse_document, parse_uuid, validate_name};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NoteDetail;

#[derive(Debug, Deserialize)]
pub struct UpdateNoteBody {
    pub title: Option<String>,
    pub content: Option<Value>,
}

/// GET /api/notes/:id - Note for the editor, with its notebook
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": "uuid", "notebook_id": "uuid", "title": "Plan",
///     "content": { "type": "doc", "content": [] },
///     "notebook": { "id": "uuid", "name": "Work" },
///     "checksum": "sha256 hex", "word_count": 0, "character_count": 0, "outline": []
///   }
/// }
/// ```
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<NoteDetail> {
    let note_id = parse_uuid("id", &id)?;
    let entry = state.store.get_note_by_id(user.user_id, note_id).await?;
    let detail = NoteDetail::new(entry).map_err(|e| {
        tracing::error!(%note_id, "Stored note content is unreadable: {}", e);
        ApiError::internal_server_error("Stored note content is unreadable")
    })?;
    Ok(ApiResponse::success(detail))
}

/// PATCH /api/notes/:id - Save title and/or content
///
/// The editor saves on every change, so this is the hot path. Content is
/// validated, stored in object form, and the last write wins.
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNoteBody>, JsonRejection>,
) -> ApiResult<Note> {
    let note_id = parse_uuid("id", &id)?;
    let Json(body) = payload?;

    let changes = NoteChanges {
        title: body
            .title
            .as_deref()
            .map(|title| validate_name("title", Some(title)))
            .transpose()?,
        content: body
            .content
            .map(|value| parse_document(value, &state.validation_options()))
            .transpose()?,
    };
    if changes.is_empty() {
        return Err(ApiError::validation_error(
            "Provide a title or content to update",
            None,
        ));
    }

    let note = state.store.update_note(user.user_id, note_id, changes).await?;
    tracing::debug!(%note_id, "Note saved");
    Ok(ApiResponse::success(note))
}

/// DELETE /api/notes/:id - Delete a note
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let note_id = parse_uuid("id", &id)?;
    state.store.delete_note(user.user_id, note_id).await?;
    tracing::info!(%note_id, user_id = %user.user_id, "Note deleted");
    Ok(ApiResponse::deleted(note_id))
}
