//! LLM prompt constants and the instruction payload for timeline extraction.

use serde_json::{json, Value};

/// System prompt for timeline extraction — enforces JSON-only output.
pub const TIMELINE_SYSTEM: &str = "You are a relocation timeline extractor. \
    Read the scenario text and produce a concise, normalized timeline JSON \
    matching the provided schema. Use reasonable defaults when needed. \
    Return strictly valid JSON with no prose. Strictly output JSON only.";

/// Field-by-field schema description sent to the model inside the user payload.
fn schema_description() -> Value {
    json!({
        "headline": "string",
        "budget_total_usd": "number",
        "timeframe_months": "integer",
        "phases": [
            {
                "name": "string",
                "start_month": "integer",
                "end_month": "integer",
                "summary": "string",
                "tasks": [
                    {
                        "title": "string",
                        "desc": "string",
                        "cost_usd": "number",
                        "duration_weeks": "number",
                        "milestone": "boolean",
                    }
                ],
            }
        ],
        "milestones": [
            {"title": "string", "month": "number", "note": "string"}
        ],
        "notes": "string",
        "confidence": "number between 0 and 1",
    })
}

/// Builds the JSON instruction payload used as the user message content.
pub fn build_instruction_payload(
    scenario_key: Option<&str>,
    scenario_title: Option<&str>,
    preferences: Option<&Value>,
    scenario_text: &str,
) -> Value {
    json!({
        "scenario_key": scenario_key,
        "scenario_title": scenario_title,
        "preferences": preferences.cloned().unwrap_or_else(|| json!({})),
        "schema": schema_description(),
        "scenario_text": scenario_text,
        "rules": [
            "Infer total budget (USD) and timeframe (months) if implied",
            "Limit tasks per phase to at most 6 concise items",
            "Mark key steps as milestone: true",
            "Clamp negative numbers to zero and omit impossible fields",
            "Omit null fields where not applicable",
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_carries_scenario_text_and_schema() {
        let payload = build_instruction_payload(
            Some("cheapest"),
            Some("The Frugal Mover"),
            None,
            "Move from Austin to Berlin",
        );
        assert_eq!(payload["scenario_key"], "cheapest");
        assert_eq!(payload["scenario_title"], "The Frugal Mover");
        assert_eq!(payload["scenario_text"], "Move from Austin to Berlin");
        assert_eq!(payload["schema"]["timeframe_months"], "integer");
        assert_eq!(payload["preferences"], json!({}));
        assert_eq!(payload["rules"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_missing_scenario_fields_serialize_as_null() {
        let payload = build_instruction_payload(None, None, None, "text");
        assert!(payload["scenario_key"].is_null());
        assert!(payload["scenario_title"].is_null());
    }

    #[test]
    fn test_preferences_pass_through() {
        let prefs = json!({"pets": 1, "household_size": 2});
        let payload = build_instruction_payload(None, None, Some(&prefs), "text");
        assert_eq!(payload["preferences"], prefs);
    }
}
