use axum::Json;
use serde_json::{json, Value};

/// GET / - Service information
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Notes API",
            "version": version,
            "description": "Notebooks and rich-text notes backed by the editor's JSON document model",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/whoami (protected)",
                "notebooks": "/api/notebooks[/:id[/notes]] (protected)",
                "notes": "/api/notes/:id[/preview|/export] (protected)",
                "sidebar": "/api/sidebar?search= (protected)",
                "documents": "/api/documents/validate (protected)",
            }
        }
    }))
}
