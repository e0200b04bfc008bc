//! Post-extraction numeric normalization for timeline payloads.
//!
//! Month counts coming back from the model may be floats, numeric strings,
//! or negative. Normalization rounds them half-up, clamps to zero, and
//! restores the per-phase ordering invariant before schema validation runs.

use serde_json::{Map, Value};

/// Normalizes the month-count fields of an extracted timeline object.
///
/// Pure transform: returns a new value and leaves the input untouched.
/// Total: absent fields stay absent, and values that cannot be read as
/// numbers pass through unchanged for schema validation to reject.
///
/// Where a phase ends up with both bounds as integers and `end < start`,
/// the end is raised to the start — the earlier bound is never lowered.
pub fn normalize_timeline(value: &Value) -> Value {
    let Value::Object(obj) = value else {
        return value.clone();
    };
    let mut out = obj.clone();

    // The top-level field only coerces genuine JSON numbers.
    let timeframe = out
        .get("timeframe_months")
        .filter(|v| v.is_number())
        .and_then(round_nonneg_int);
    if let Some(n) = timeframe {
        out.insert("timeframe_months".to_string(), Value::from(n));
    }

    if let Some(Value::Array(phases)) = out.get_mut("phases") {
        for phase in phases.iter_mut() {
            let Value::Object(ph) = phase else { continue };
            let start = coerce_month(ph, "start_month");
            let end = coerce_month(ph, "end_month");
            if let (Some(s), Some(e)) = (start, end) {
                if e < s {
                    ph.insert("end_month".to_string(), Value::from(s));
                }
            }
        }
    }

    Value::Object(out)
}

/// Rounds a phase month in place when it reads as a number (numeric strings
/// included); returns the rounded value when it applied.
fn coerce_month(phase: &mut Map<String, Value>, key: &str) -> Option<i64> {
    let current = phase.get(key)?;
    if current.is_null() {
        return None;
    }
    let rounded = round_nonneg_int(current)?;
    phase.insert(key.to_string(), Value::from(rounded));
    Some(rounded)
}

/// Round-half-up (`floor(x + 0.5)`) clamped to a minimum of 0.
fn round_nonneg_int(value: &Value) -> Option<i64> {
    let x = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !x.is_finite() {
        return None;
    }
    Some(((x + 0.5).floor() as i64).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn phase_months(value: &Value, idx: usize) -> (Option<&Value>, Option<&Value>) {
        let phase = &value["phases"][idx];
        (phase.get("start_month"), phase.get("end_month"))
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(round_nonneg_int(&json!(2.5)), Some(3));
        assert_eq!(round_nonneg_int(&json!(2.4)), Some(2));
        assert_eq!(round_nonneg_int(&json!(2.6)), Some(3));
        assert_eq!(round_nonneg_int(&json!(7)), Some(7));
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        assert_eq!(round_nonneg_int(&json!(-3)), Some(0));
        assert_eq!(round_nonneg_int(&json!(-0.4)), Some(0));
        assert_eq!(round_nonneg_int(&json!(-0.5)), Some(0));
        assert_eq!(round_nonneg_int(&json!(-1.2)), Some(0));
    }

    #[test]
    fn test_numeric_strings_parse() {
        assert_eq!(round_nonneg_int(&json!("3.7")), Some(4));
        assert_eq!(round_nonneg_int(&json!(" 5 ")), Some(5));
        assert_eq!(round_nonneg_int(&json!("three")), None);
        assert_eq!(round_nonneg_int(&json!("NaN")), None);
        assert_eq!(round_nonneg_int(&json!("inf")), None);
    }

    #[test]
    fn test_timeframe_number_is_rounded() {
        let out = normalize_timeline(&json!({"timeframe_months": 6.5}));
        assert_eq!(out["timeframe_months"], 7);
    }

    #[test]
    fn test_timeframe_string_passes_through() {
        // The top-level field only coerces real numbers; strings are left
        // for schema validation to reject.
        let out = normalize_timeline(&json!({"timeframe_months": "6"}));
        assert_eq!(out["timeframe_months"], "6");
    }

    #[test]
    fn test_phase_months_round_independently() {
        let out = normalize_timeline(&json!({
            "phases": [{"name": "Visa", "start_month": 0.6, "end_month": "2.4"}]
        }));
        let (start, end) = phase_months(&out, 0);
        assert_eq!(start, Some(&json!(1)));
        assert_eq!(end, Some(&json!(2)));
    }

    #[test]
    fn test_end_before_start_is_raised_to_start() {
        let out = normalize_timeline(&json!({
            "phases": [{"name": "Housing", "start_month": 5, "end_month": 3}]
        }));
        let (start, end) = phase_months(&out, 0);
        assert_eq!(start, Some(&json!(5)));
        assert_eq!(end, Some(&json!(5)));
    }

    #[test]
    fn test_absent_start_leaves_end_alone() {
        let out = normalize_timeline(&json!({
            "phases": [{"name": "Packing", "end_month": 4}]
        }));
        let (start, end) = phase_months(&out, 0);
        assert_eq!(start, None);
        assert_eq!(end, Some(&json!(4)));
    }

    #[test]
    fn test_unparsable_month_passes_through_unordered() {
        let out = normalize_timeline(&json!({
            "phases": [{"name": "Visa", "start_month": "soon", "end_month": 1}]
        }));
        let (start, end) = phase_months(&out, 0);
        // No ordering repair without a rounded start
        assert_eq!(start, Some(&json!("soon")));
        assert_eq!(end, Some(&json!(1)));
    }

    #[test]
    fn test_null_months_stay_null() {
        let out = normalize_timeline(&json!({
            "phases": [{"name": "Visa", "start_month": null, "end_month": 2}]
        }));
        let (start, end) = phase_months(&out, 0);
        assert_eq!(start, Some(&Value::Null));
        assert_eq!(end, Some(&json!(2)));
    }

    #[test]
    fn test_non_object_phases_are_skipped() {
        let input = json!({"phases": ["not a phase", {"name": "Visa", "start_month": 1.5}]});
        let out = normalize_timeline(&input);
        assert_eq!(out["phases"][0], "not a phase");
        assert_eq!(out["phases"][1]["start_month"], 2);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = json!({"timeframe_months": 6.5, "phases": [{"start_month": 5, "end_month": 3}]});
        let snapshot = input.clone();
        let _ = normalize_timeline(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let out = normalize_timeline(&json!({"headline": "Plan"}));
        assert_eq!(out, json!({"headline": "Plan"}));
    }

    #[test]
    fn test_non_object_input_passes_through() {
        let out = normalize_timeline(&json!([1, 2]));
        assert_eq!(out, json!([1, 2]));
    }
}
