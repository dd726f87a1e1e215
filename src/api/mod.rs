mod handlers;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::CatalogStore;
use crate::session::SessionScope;

pub use handlers::{AddLineInput, AddPhotoInput, BuildSummary, VisibilityResponse};

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub scope: Arc<SessionScope>,
    pub share_base_url: String,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogStore>,
        scope: Arc<SessionScope>,
        share_base_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            scope,
            share_base_url: share_base_url.into(),
        }
    }
}

pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        // Catalog
        .route("/catalog/equipment", get(handlers::search_equipment))
        .route("/catalog/equipment/{id}", get(handlers::get_equipment))
        .route("/catalog/livestock", get(handlers::search_livestock))
        // Build
        .route(
            "/build",
            get(handlers::get_build)
                .put(handlers::update_build)
                .delete(handlers::reset_build),
        )
        .route("/build/summary", get(handlers::get_summary))
        .route("/build/visibility", post(handlers::toggle_visibility))
        .route("/build/equipment", post(handlers::add_equipment))
        .route("/build/equipment/{id}", delete(handlers::remove_equipment))
        .route("/build/fish", post(handlers::add_fish))
        .route("/build/fish/{id}", delete(handlers::remove_fish))
        .route("/build/plants", post(handlers::add_plant))
        .route("/build/plants/{id}", delete(handlers::remove_plant))
        .route("/build/photos", post(handlers::add_photo))
        .route("/build/photos/{index}", delete(handlers::remove_photo))
        // Comments
        .route(
            "/build/comments",
            get(handlers::list_comments).post(handlers::post_comment),
        )
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Permissive when no origins are configured, otherwise restricted to the list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
