mod config;
mod db;
mod errors;
mod llm_client;
mod routes;
mod simulation;
mod state;
mod timeline;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_lazy_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("api={}", &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ReloSim API v{}", env!("CARGO_PKG_VERSION"));

    // Collaborators are optional: a missing value surfaces in the dependent
    // route's error payload, not at startup.
    let db = match config.database_url.as_deref() {
        Some(url) => Some(create_lazy_pool(url)?),
        None => {
            warn!("DATABASE_URL not set; /api/db-ping will report the missing value");
            None
        }
    };

    let llm = match config.openai_api_key.clone() {
        Some(key) => {
            let client = LlmClient::new(key, config.openai_model.clone());
            info!("LLM client initialized (model: {})", client.model());
            Some(client)
        }
        None => {
            warn!("OPENAI_API_KEY not set; LLM routes will report the missing value");
            None
        }
    };

    let state = AppState { db, llm };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
