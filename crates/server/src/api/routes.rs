use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, middleware, runs};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Batch runs
        .route("/runs", post(runs::start_run))
        .route("/runs/current", get(runs::current_run))
        .route("/runs/{id}", get(runs::get_run))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(from_fn(middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
