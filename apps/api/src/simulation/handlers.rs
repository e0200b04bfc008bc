//! Axum route handler for the simulation endpoint.
//!
//! The transport is streaming-style but the payload is produced in one shot:
//! the LLM is called non-streaming and the result is emitted as a single
//! JSON chunk. Every failure is folded into the chunk as `{"error": ...}` —
//! this handler never returns an error response.

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use futures::stream;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::llm_client::extract::extract_json;
use crate::llm_client::ChatMessage;
use crate::simulation::prompts::{build_messages, TripFields};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StreamRequest {
    #[serde(flatten)]
    pub trip: TripFields,
    /// Freeform fallback when no structured field is present.
    pub prompt: Option<String>,
    /// A label (cheapest, balanced, fastest, luxury) or an index.
    pub scenario: Option<Value>,
}

/// POST /api/stream
pub async fn handle_stream(
    State(state): State<AppState>,
    Json(req): Json<StreamRequest>,
) -> Response {
    let payload = run_simulation(&state, &req).await;
    single_chunk(payload)
}

async fn run_simulation(state: &AppState, req: &StreamRequest) -> Vec<u8> {
    let Some(llm) = state.llm.as_ref() else {
        return error_chunk("Missing OPENAI_API_KEY");
    };

    let messages = if req.trip.has_any() {
        build_messages(&req.trip, &scenario_key(req.scenario.as_ref()))
    } else {
        let prompt = req
            .prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("Provide a short sample.");
        vec![ChatMessage::user(prompt)]
    };

    match llm.respond(&messages).await {
        Ok(resp) => {
            let data = extract_json(&resp);
            if data.is_empty() {
                error_chunk("Failed to parse response")
            } else {
                serde_json::to_vec(&Value::Object(data)).unwrap_or_default()
            }
        }
        Err(e) => {
            warn!("simulation call failed: {e}");
            error_chunk(&e.to_string())
        }
    }
}

/// Stringifies and lowercases the scenario selector; null, empty, or absent
/// values default to "balanced".
fn scenario_key(scenario: Option<&Value>) -> String {
    let key = match scenario {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Null) | None => "balanced".to_string(),
        Some(Value::String(_)) => "balanced".to_string(),
        Some(other) => other.to_string(),
    };
    key.to_lowercase()
}

fn error_chunk(message: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({ "error": message })).unwrap_or_default()
}

/// Wraps the payload as the single chunk of a streaming-style response body.
fn single_chunk(payload: Vec<u8>) -> Response {
    let body = Body::from_stream(stream::once(async move {
        Ok::<_, std::convert::Infallible>(Bytes::from(payload))
    }));
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    #[test]
    fn test_scenario_key_from_label() {
        let v = Value::String("Fastest".to_string());
        assert_eq!(scenario_key(Some(&v)), "fastest");
    }

    #[test]
    fn test_scenario_key_from_index() {
        let v = Value::from(2);
        assert_eq!(scenario_key(Some(&v)), "2");
    }

    #[test]
    fn test_scenario_key_defaults_to_balanced() {
        assert_eq!(scenario_key(None), "balanced");
        assert_eq!(scenario_key(Some(&Value::Null)), "balanced");
        assert_eq!(scenario_key(Some(&Value::String(String::new()))), "balanced");
    }

    #[tokio::test]
    async fn test_missing_api_key_yields_error_chunk_with_200() {
        let state = AppState { db: None, llm: None };
        let req: StreamRequest = serde_json::from_value(json!({
            "start_city": "Austin",
            "destination_city": "Berlin"
        }))
        .unwrap();

        let resp = handle_stream(State(state), Json(req)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let chunk: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(chunk["error"], "Missing OPENAI_API_KEY");
    }

    #[test]
    fn test_stream_request_accepts_freeform_prompt_only() {
        let req: StreamRequest = serde_json::from_value(json!({
            "prompt": "Plan a move",
            "scenario": "luxury"
        }))
        .unwrap();
        assert!(!req.trip.has_any());
        assert_eq!(req.prompt.as_deref(), Some("Plan a move"));
    }
}
