//! Timeline schema types and validation.
//!
//! Validation is two-stage: a structural deserialize that reports the JSON
//! path of the first mismatch, then range checks that collect every violated
//! field at once.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::FieldViolation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineTask {
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub cost_usd: Option<f64>,
    #[serde(default)]
    pub duration_weeks: Option<f64>,
    #[serde(default = "default_false")]
    pub milestone: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePhase {
    pub name: String,
    #[serde(default)]
    pub start_month: Option<u32>,
    #[serde(default)]
    pub end_month: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TimelineTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub budget_total_usd: Option<f64>,
    #[serde(default)]
    pub timeframe_months: Option<u32>,
    /// Required: an empty extraction must fail validation here instead of
    /// serializing as an all-default success.
    pub phases: Vec<TimelinePhase>,
    #[serde(default)]
    pub milestones: Option<Vec<Value>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: Option<f64>,
}

fn default_false() -> Option<bool> {
    Some(false)
}

fn default_confidence() -> Option<f64> {
    Some(0.7)
}

impl TimelineResponse {
    /// Range constraints not expressible in the serde types. Collects every
    /// violation so the client sees all failing fields at once.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if let Some(budget) = self.budget_total_usd {
            if budget < 0.0 {
                violations.push(FieldViolation::new("budget_total_usd", "must be non-negative"));
            }
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                violations.push(FieldViolation::new("confidence", "must be between 0 and 1"));
            }
        }
        for (pi, phase) in self.phases.iter().enumerate() {
            for (ti, task) in phase.tasks.iter().enumerate() {
                if let Some(cost) = task.cost_usd {
                    if cost < 0.0 {
                        violations.push(FieldViolation::new(
                            format!("phases[{pi}].tasks[{ti}].cost_usd"),
                            "must be non-negative",
                        ));
                    }
                }
                if let Some(weeks) = task.duration_weeks {
                    if weeks < 0.0 {
                        violations.push(FieldViolation::new(
                            format!("phases[{pi}].tasks[{ti}].duration_weeks"),
                            "must be non-negative",
                        ));
                    }
                }
            }
        }

        violations
    }
}

/// Deserializes a normalized payload and enforces the schema's constraints.
///
/// Structural mismatches report the JSON path of the failure; a payload that
/// deserializes is then range-checked as a whole.
pub fn parse_and_validate(value: Value) -> Result<TimelineResponse, Vec<FieldViolation>> {
    let timeline: TimelineResponse = serde_path_to_error::deserialize(value).map_err(|e| {
        vec![FieldViolation::new(
            e.path().to_string(),
            e.inner().to_string(),
        )]
    })?;

    let violations = timeline.validate();
    if violations.is_empty() {
        Ok(timeline)
    } else {
        Err(violations)
    }
}
