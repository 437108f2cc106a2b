use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::search::{build_navigation, filter_navigation, highlight, NavNote, NavNotebook, Segment};

#[derive(Debug, Deserialize)]
pub struct SidebarQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Sidebar {
    pub query: String,
    pub notebooks: Vec<SidebarNotebook>,
}

#[derive(Debug, Serialize)]
pub struct SidebarNotebook {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    /// Title split around the query for highlighting
    pub segments: Vec<Segment>,
    pub items: Vec<SidebarNote>,
}

#[derive(Debug, Serialize)]
pub struct SidebarNote {
    #[serde(flatten)]
    pub note: NavNote,
    pub segments: Vec<Segment>,
}

impl SidebarNotebook {
    fn new(notebook: NavNotebook, query: &str) -> Self {
        Self {
            segments: highlight(&notebook.title, query),
            items: notebook
                .items
                .into_iter()
                .map(|note| SidebarNote {
                    segments: highlight(&note.title, query),
                    note,
                })
                .collect(),
            id: notebook.id,
            title: notebook.title,
            url: notebook.url,
        }
    }
}

/// GET /api/sidebar?search= - Navigation tree filtered by title
///
/// Without `search` every notebook is listed. With it, only notebooks whose
/// name or note titles contain the query (case-insensitive) remain; their
/// notes are all kept and flagged with `is_match`.
pub async fn sidebar(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<SidebarQuery>, QueryRejection>,
) -> ApiResult<Sidebar> {
    let Query(query) = query?;
    let search = query.search.unwrap_or_default().trim().to_string();

    let notebooks = state.store.get_notebooks(user.user_id).await?;
    let nav = filter_navigation(build_navigation(&notebooks), &search);

    Ok(ApiResponse::success(Sidebar {
        notebooks: nav
            .into_iter()
            .map(|notebook| SidebarNotebook::new(notebook, &search))
            .collect(),
        query: search,
    }))
}
