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
        .route("/api/v1/candidates/rank", post(handlers::handle_rank))
        .route("/api/v1/candidates/summary", post(handlers::handle_summary))
        .with_state(state)
}
