//! Tolerant JSON extraction from provider responses.
//!
//! The Responses API does not keep one output shape across models and
//! versions: the payload may arrive as an aggregated `output_text` string,
//! as typed content parts, or only be recoverable by scanning the raw body.
//! Extraction probes three tiers in strict precedence order and degrades to
//! an empty map instead of failing the request.

use serde_json::{Map, Value};

use super::LlmResponse;

/// Extracts the first well-formed JSON object from a Responses API result.
///
/// Total: every parse failure falls through to the next tier, and an empty
/// map is returned when nothing is recoverable. Only objects are accepted —
/// a tier that parses to an array or scalar falls through like a failure.
pub fn extract_json(resp: &LlmResponse) -> Map<String, Value> {
    // 1) Direct text aggregate
    if let Some(text) = resp.body.output_text.as_deref() {
        if !text.trim().is_empty() {
            if let Some(obj) = parse_object(text) {
                return obj;
            }
        }
    }

    // 2) Structured parts: first output item, first content part
    if let Some(obj) = extract_from_parts(resp) {
        return obj;
    }

    // 3) Last resort: scan whatever string form exists for a JSON substring
    let blob = match resp.body.output_text.as_deref() {
        Some(text) if !text.trim().is_empty() => text,
        _ => resp.raw.as_str(),
    };
    if let Some(obj) = parse_object_substring(blob) {
        return obj;
    }

    Map::new()
}

fn extract_from_parts(resp: &LlmResponse) -> Option<Map<String, Value>> {
    let part = resp
        .body
        .output
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .first()?;

    if part.part_type.as_deref() == Some("output_json") {
        match &part.json {
            Some(Value::Object(obj)) => return Some(obj.clone()),
            // Sometimes the native payload arrives as a string
            Some(Value::String(s)) => {
                if let Some(obj) = parse_object(s) {
                    return Some(obj);
                }
            }
            _ => {}
        }
    }

    // Fall back to the part's text field
    let text = part.text.as_deref()?;
    if text.trim().is_empty() {
        return None;
    }
    parse_object(text)
}

/// Parses `text` as JSON, accepting only objects.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

/// Parses the substring between the first `{` and the last `}` inclusive.
fn parse_object_substring(blob: &str) -> Option<Map<String, Value>> {
    let start = blob.find('{')?;
    let end = blob.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&blob[start..=end])
}
