//! Axum route handler for timeline extraction.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{error, warn};

use crate::errors::AppError;
use crate::llm_client::extract::extract_json;
use crate::llm_client::{ChatMessage, LlmClient, LlmResponse};
use crate::state::AppState;
use crate::timeline::models::{parse_and_validate, TimelineResponse};
use crate::timeline::normalize::normalize_timeline;
use crate::timeline::prompts::{build_instruction_payload, TIMELINE_SYSTEM};

/// Raw scenario text is clipped to this many characters before prompting.
const MAX_RAW_TEXT_CHARS: usize = 12_000;

#[derive(Debug, Deserialize)]
pub struct TimelineRequest {
    /// cheapest | balanced | fastest | luxury
    #[serde(default)]
    pub scenario_key: Option<String>,
    #[serde(default)]
    pub scenario_title: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub raw_text: String,
    #[serde(default)]
    pub preferences: Option<Value>,
}

/// Rejects empty `raw_text` at deserialization time, so the `Json` extractor
/// refuses the body before the handler runs.
fn non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::invalid_length(0, &"a non-empty string"));
    }
    Ok(s)
}

/// POST /api/timeline
///
/// The primary call goes through the Responses API. A 400 rejection gets
/// exactly one retry through chat completions with the same content; no
/// other failure is retried.
pub async fn handle_timeline(
    State(state): State<AppState>,
    Json(req): Json<TimelineRequest>,
) -> Result<Json<TimelineResponse>, AppError> {
    let llm = state
        .llm
        .as_ref()
        .ok_or(AppError::MissingConfig("OPENAI_API_KEY"))?;

    let raw_text = clip_chars(req.raw_text.trim(), MAX_RAW_TEXT_CHARS);

    let payload = build_instruction_payload(
        req.scenario_key.as_deref(),
        req.scenario_title.as_deref(),
        req.preferences.as_ref(),
        &raw_text,
    );
    let messages = vec![
        ChatMessage::system(TIMELINE_SYSTEM),
        ChatMessage::user(payload.to_string()),
    ];

    let extracted = match llm.respond(&messages).await {
        Ok(resp) => extract_json(&resp),
        Err(primary) if primary.is_bad_request() => {
            // One-shot fallback to chat completions for older models/configs
            warn!("responses API rejected timeline request, falling back to chat: {primary}");
            match chat_fallback(llm, &messages).await {
                Ok(extracted) => extracted,
                Err(e) => {
                    error!("timeline chat fallback failed: {e}");
                    return Err(AppError::UpstreamRejected(primary.to_string()));
                }
            }
        }
        Err(e) => return Err(AppError::Llm(e.to_string())),
    };

    let normalized = normalize_timeline(&Value::Object(extracted));
    let timeline = parse_and_validate(normalized).map_err(AppError::Validation)?;
    Ok(Json(timeline))
}

/// The fallback path reuses the same messages and the same extraction tiers;
/// the chat content plays the role of the aggregated text field.
async fn chat_fallback(
    llm: &LlmClient,
    messages: &[ChatMessage],
) -> Result<serde_json::Map<String, Value>, crate::llm_client::LlmError> {
    let content = llm.chat(messages).await?;
    Ok(extract_json(&LlmResponse::from_text(content)))
}

/// Clips to at most `max` characters, respecting char boundaries.
fn clip_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
