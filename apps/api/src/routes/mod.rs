pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::simulation;
use crate::state::AppState;
use crate::timeline;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/hello", get(health::hello_handler))
        .route("/api/db-ping", get(health::db_ping_handler))
        .route("/api/stream", post(simulation::handlers::handle_stream))
        .route("/api/timeline", post(timeline::handlers::handle_timeline))
        .with_state(state)
}
