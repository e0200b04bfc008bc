use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates a lazy PostgreSQL connection pool.
///
/// Connections are only established on first use, so the process starts
/// without a reachable database and the probe route reports failures at
/// request time.
pub fn create_lazy_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(database_url)?;

    info!("PostgreSQL lazy pool configured");
    Ok(pool)
}
