use serde_json::Value;
use uuid::Uuid;

use crate::document::{validate, Document, ValidationOptions};
use crate::error::ApiError;

/// Longest accepted notebook name or note title, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Parse a path id, answering 400 instead of axum's plain-text rejection
pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::field_error(field, format!("Invalid UUID format: {}", raw)))
}

/// Trimmed, non-empty name of at most [`MAX_NAME_LENGTH`] characters
pub fn validate_name(field: &str, raw: Option<&str>) -> Result<String, ApiError> {
    let name = raw.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ApiError::field_error(field, "This field is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::field_error(
            field,
            format!("Must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(name.to_string())
}

/// Parse and validate editor content before it is stored
pub fn parse_document(value: Value, options: &ValidationOptions) -> Result<Document, ApiError> {
    let doc = Document::from_value(value)?;
    validate(&doc, options)?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(validate_name("name", Some("  Work  ")).unwrap(), "Work");
        assert_eq!(validate_name("name", None).unwrap_err().status_code(), 400);
        assert_eq!(validate_name("name", Some("   ")).unwrap_err().status_code(), 400);
        assert!(validate_name("name", Some(&"é".repeat(255))).is_ok());

        let err = validate_name("name", Some(&"x".repeat(256))).unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["name"], "Must be at most 255 characters");
    }

    #[test]
    fn rejects_bad_uuids() {
        let err = parse_uuid("id", "not-a-uuid").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(parse_uuid("id", &Uuid::new_v4().to_string()).is_ok());
    }

    #[test]
    fn documents_are_validated() {
        let options = ValidationOptions::default();
        assert!(parse_document(json!([{ "type": "paragraph" }]), &options).is_ok());
        assert_eq!(parse_document(json!("text"), &options).unwrap_err().status_code(), 400);
        assert_eq!(
            parse_document(json!([{ "type": "heading", "attrs": { "level": 9 } }]), &options)
                .unwrap_err()
                .status_code(),
            422
        );
    }
}
