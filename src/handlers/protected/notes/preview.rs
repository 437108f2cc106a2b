use axum::{
    extract::{Path, State},
    Extension,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::protected::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NotePreview;

/// GET /api/notes/:id/preview - Read-only rendering of a note
pub async fn preview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<NotePreview> {
    let note_id = parse_uuid("id", &id)?;
    let entry = state.store.get_note_by_id(user.user_id, note_id).await?;
    let preview = NotePreview::new(&entry).map_err(|e| {
        tracing::error!(%note_id, "Stored note content is unreadable: {}", e);
        ApiError::internal_server_error("Stored note content is unreadable")
    })?;
    Ok(ApiResponse::success(preview))
}
