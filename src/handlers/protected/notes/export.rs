use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, ETAG},
        HeaderValue,
    },
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::document::Document;
use crate::error::ApiError;
use crate::handlers::protected::utils::parse_uuid;
use crate::middleware::AuthUser;
use crate::services::{cards::display_title, content_checksum, file_name, ExportFormat};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// html (default), markdown/md, text/txt or json
    pub format: Option<String>,
}

/// GET /api/notes/:id/export?format= - Download a note
///
/// Responds with the raw rendering (not the JSON envelope), a
/// `Content-Disposition` attachment name derived from the title and an
/// `ETag` of the stored content.
pub async fn export(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let note_id = parse_uuid("id", &id)?;
    let Query(query) = query?;
    let format = match query.format.as_deref() {
        None => ExportFormat::default(),
        Some(raw) => ExportFormat::parse(raw).ok_or_else(|| {
            ApiError::field_error("format", "Must be one of html, markdown, text, json")
        })?,
    };

    let entry = state.store.get_note_by_id(user.user_id, note_id).await?;
    let doc = entry
        .note
        .document()
        .map_err(|e| {
            tracing::error!(%note_id, "Stored note content is unreadable: {}", e);
            ApiError::internal_server_error("Stored note content is unreadable")
        })?
        .unwrap_or_else(Document::empty);

    let title = display_title(&entry.note.title);
    let exported = format.export(title, &doc);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        file_name(title, exported.extension)
    );

    let mut response = exported.body.into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(exported.content_type));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, value);
    }
    if let Some(checksum) = content_checksum(entry.note.content.as_ref()) {
        if let Ok(value) = HeaderValue::from_str(&format!("\"{}\"", checksum)) {
            headers.insert(ETAG, value);
        }
    }
    Ok(response)
}
