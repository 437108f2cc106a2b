use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::{ApiResponse, AuthUser};

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// GET /api/auth/whoami - The user behind the current session
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": { "user_id": "uuid", "email": "user@example.com", "name": null }
/// }
/// ```
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResponse<WhoAmI> {
    ApiResponse::success(WhoAmI {
        user_id: user.user_id,
        email: user.email,
        name: user.name,
    })
}
