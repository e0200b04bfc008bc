use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use sqlx::Row;

use crate::errors::AppError;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "relosim-api"
    }))
}

/// GET /api/hello
pub async fn hello_handler() -> &'static str {
    "Hello from Axum 👋"
}

/// GET /api/db-ping
/// Probes the database with `SELECT 1`. The pool is lazy, so connection
/// failures surface here rather than at startup.
pub async fn db_ping_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let pool = state
        .db
        .as_ref()
        .ok_or(AppError::MissingConfig("DATABASE_URL"))?;

    let row = sqlx::query("SELECT 1").fetch_one(pool).await?;
    let one: i32 = row.try_get(0)?;

    Ok(Json(json!({ "ok": true, "result": one })))
}
