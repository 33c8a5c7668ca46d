use crate::{
    handlers,
    AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/test", get(handlers::health))
        .route("/api/contact", post(handlers::send_contact))
        .route("/api/instagram/media", get(handlers::list_media))
        .route("/api/instagram/clear-cache", post(handlers::clear_media_cache))
        .route("/auth/instagram", get(handlers::instagram_authorize))
        .route("/auth/instagram/callback", get(handlers::instagram_callback))
        .route("/auth/instagram/refresh_token", get(handlers::instagram_refresh_token))
        .route(
            "/auth/webhook",
            get(handlers::verify_webhook).post(handlers::receive_webhook),
        )
        // Middleware Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state) // Pass the application state
}
