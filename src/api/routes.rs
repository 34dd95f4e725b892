use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::session::{make_span_with_session, session_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(session_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_session))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/properties", get(handlers::list_properties))
        .route("/properties/:id", get(handlers::get_property))
        // Behavior tracking
        .route("/behavior", get(handlers::get_behavior))
        .route("/behavior/events", post(handlers::track_event))
        .route("/behavior/preferences", put(handlers::set_preferences))
        // Recommendations
        .route("/recommendations", post(handlers::recommend))
}
