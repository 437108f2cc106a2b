use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::app::AppState;
use crate::document::{self, text, Document, DocumentError, Violation};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub node_count: usize,
    pub word_count: usize,
    pub character_count: usize,
}

/// POST /api/documents/validate - Check editor content without saving it
///
/// Structural problems are reported in the body with `valid: false`; only
/// JSON that is not a document at all is rejected with 400.
pub async fn validate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<ValidationReport> {
    let Json(value) = payload?;
    let doc = match Document::from_value(value) {
        Ok(doc) => doc,
        Err(DocumentError::Invalid(violations)) => {
            return Ok(ApiResponse::success(ValidationReport {
                valid: false,
                violations,
                node_count: 0,
                word_count: 0,
                character_count: 0,
            }));
        }
        Err(err) => return Err(err.into()),
    };

    let violations = match document::validate(&doc, &state.validation_options()) {
        Ok(()) => Vec::new(),
        Err(err) => err.violations().to_vec(),
    };

    Ok(ApiResponse::success(ValidationReport {
        valid: violations.is_empty(),
        violations,
        node_count: doc.node_count(),
        word_count: text::word_count(&doc),
        character_count: text::character_count(&doc),
    }))
}
