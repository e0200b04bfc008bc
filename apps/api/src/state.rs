use sqlx::PgPool;

use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Both collaborators are optional: the process serves its routes without
/// them, and each dependent operation reports the missing configuration in
/// its own error payload.
#[derive(Clone)]
pub struct AppState {
    pub db: Option<PgPool>,
    pub llm: Option<LlmClient>,
}
