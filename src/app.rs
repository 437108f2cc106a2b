use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::SessionProvider;
use crate::config::AppConfig;
use crate::database::NoteStore;
use crate::document::ValidationOptions;
use crate::handlers::{protected, public};
use crate::middleware::session_auth_middleware;

/// Shared handles every handler receives
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NoteStore>,
    pub sessions: Arc<dyn SessionProvider>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn NoteStore>,
        sessions: Arc<dyn SessionProvider>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            sessions,
            config: Arc::new(config),
        }
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions::from(&self.config.document)
    }
}

/// Full router: public routes, session-protected `/api` routes, global layers
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth_routes())
        .merge(notebook_routes())
        .merge(note_routes())
        .merge(sidebar_routes())
        .merge(document_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes)),
        );

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config));
    }

    router.with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

fn auth_routes() -> Router<AppState> {
    use protected::auth;

    Router::new().route("/api/auth/whoami", get(auth::whoami))
}

fn notebook_routes() -> Router<AppState> {
    use protected::notebooks;

    Router::new()
        .route(
            "/api/notebooks",
            get(notebooks::notebooks_get).post(notebooks::notebooks_post),
        )
        .route(
            "/api/notebooks/:id",
            get(notebooks::notebook_get)
                .patch(notebooks::notebook_patch)
                .delete(notebooks::notebook_delete),
        )
        .route(
            "/api/notebooks/:id/notes",
            get(notebooks::notebook_notes_get).post(notebooks::notebook_notes_post),
        )
}

fn note_routes() -> Router<AppState> {
    use protected::notes;

    Router::new()
        .route(
            "/api/notes/:id",
            get(notes::note_get)
                .patch(notes::note_patch)
                .delete(notes::note_delete),
        )
        .route("/api/notes/:id/preview", get(notes::note_preview))
        .route("/api/notes/:id/export", get(notes::note_export))
}

fn sidebar_routes() -> Router<AppState> {
    use protected::sidebar;

    Router::new().route("/api/sidebar", get(sidebar::sidebar_get))
}

fn document_routes() -> Router<AppState> {
    use protected::documents;

    Router::new().route("/api/documents/validate", post(documents::documents_validate))
}
