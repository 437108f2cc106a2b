use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::Notebook;
use crate::handlers::protected::utils::validate_name;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NotebookCard;

#[derive(Debug, Deserialize)]
pub struct NotebookBody {
    pub name: Option<String>,
}

/// GET /api/notebooks - Dashboard: every notebook of the user with note titles
///
/// Notebooks come oldest first; notes inside each newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<NotebookCard>> {
    let notebooks = state.store.get_notebooks(user.user_id).await?;
    Ok(ApiResponse::success(
        notebooks.into_iter().map(NotebookCard::new).collect(),
    ))
}

/// POST /api/notebooks - Create a notebook
///
/// Body: `{"name": "Work"}`; the name is trimmed and must be 1..=255 characters.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NotebookBody>, JsonRejection>,
) -> ApiResult<Notebook> {
    let Json(body) = payload?;
    let name = validate_name("name", body.name.as_deref())?;

    let notebook = state.store.create_notebook(user.user_id, &name).await?;
    tracing::info!(notebook_id = %notebook.id, user_id = %user.user_id, "Notebook created");
    Ok(ApiResponse::created(notebook))
}
