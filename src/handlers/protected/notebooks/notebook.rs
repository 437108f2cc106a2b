use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use super::collection::NotebookBody;
use crate::app::AppState;
use crate::database::models::Notebook;
use crate::handlers::protected::utils::{parse_uuid, validate_name};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NotebookPage;

/// GET /api/notebooks/:id - Notebook page with a card per note
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<NotebookPage> {
    let notebook_id = parse_uuid("id", &id)?;
    let detail = state.store.get_notebook_by_id(user.user_id, notebook_id).await?;
    Ok(ApiResponse::success(NotebookPage::new(
        detail,
        state.config.document.preview_length,
    )))
}

/// PATCH /api/notebooks/:id - Rename a notebook
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<NotebookBody>, JsonRejection>,
) -> ApiResult<Notebook> {
    let notebook_id = parse_uuid("id", &id)?;
    let Json(body) = payload?;
    let name = validate_name("name", body.name.as_deref())?;

    let notebook = state
        .store
        .update_notebook(user.user_id, notebook_id, &name)
        .await?;
    Ok(ApiResponse::success(notebook))
}

/// DELETE /api/notebooks/:id - Delete a notebook and all of its notes
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let notebook_id = parse_uuid("id", &id)?;
    state.store.delete_notebook(user.user_id, notebook_id).await?;
    tracing::info!(%notebook_id, user_id = %user.user_id, "Notebook deleted");
    Ok(ApiResponse::deleted(notebook_id))
}
