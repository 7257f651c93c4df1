//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/calculate", post(handlers::calculate))
        .route("/v1/numbers", post(handlers::store_number))
        .route("/v1/numbers/{number}", get(handlers::get_number))
        .route(
            "/v1/numbers/{number}/presence",
            get(handlers::get_presence),
        );

    let mut router = api_routes;
    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }
    // The browser front end is served from another origin.
    if state.config.server.cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
