pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/rankings", post(handlers::handle_rankings))
        .route(
            "/api/v1/rankings/batch-compare",
            post(handlers::handle_batch_compare),
        )
        .route(
            "/api/v1/alternative-roles",
            post(handlers::handle_alternative_roles),
        )
        .with_state(state)
}
