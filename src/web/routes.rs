//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        // Language switch
        .route("/language/:code", get(handlers::switch_language))
        // Back office, outside the locale router
        .route("/admin", get(handlers::admin))
        .route("/admin/*rest", get(handlers::admin))
        // API routes
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        // Static routes
        .route("/robots.txt", get(handlers::robots_txt))
        .route("/sitemap.xml", get(handlers::sitemap_xml));

    if let Some(dir) = &state.settings.server.static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        // Everything else is a storefront path
        .fallback(handlers::storefront)
        // Add middleware
        .layer(CompressionLayer::new())
        .layer(cors)
        // Add state
        .with_state(state)
}
