//! Scenario styles and the two-message prompt builder for simulation runs.

use serde::Deserialize;

use crate::llm_client::ChatMessage;

/// Closed set of relocation-planning tones that bias generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStyle {
    Cheapest,
    Balanced,
    Fastest,
    Luxury,
}

/// Bias guidance applied for the balanced style and for any unknown key.
pub const BALANCED_GUIDANCE: &str = "Balance cost, time, and convenience. \
    Choose realistic, middle-of-the-road options likely for most movers.";

impl ScenarioStyle {
    /// Case-insensitive lookup. Unknown keys resolve to no style; callers
    /// fall back to a title-cased echo with the balanced guidance.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "cheapest" => Some(Self::Cheapest),
            "balanced" => Some(Self::Balanced),
            "fastest" => Some(Self::Fastest),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cheapest => "The Frugal Mover",
            Self::Balanced => "The Balanced Mover",
            Self::Fastest => "The Fast-Track Mover",
            Self::Luxury => "The Premier Mover",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Cheapest => {
                "Prioritize minimizing cost. Prefer DIY options, budget flights, \
                 shared or modest housing, and longer timelines if it saves money."
            }
            Self::Balanced => BALANCED_GUIDANCE,
            Self::Fastest => {
                "Prioritize speed. Use approaches that reduce waiting time even at \
                 higher cost; consider premium processing, temporary housing to \
                 accelerate arrival, etc."
            }
            Self::Luxury => {
                "Prioritize convenience and service quality. Assume use of relocation \
                 agents, premium services, and higher budgets to reduce stress and delays."
            }
        }
    }
}

/// Resolves a raw scenario key to its display label and bias guidance.
pub fn resolve_scenario(key: &str) -> (String, &'static str) {
    match ScenarioStyle::from_key(key) {
        Some(style) => (style.label().to_string(), style.guidance()),
        None => (title_case(key), BALANCED_GUIDANCE),
    }
}

/// Structured trip parameters. Every field is optional; absent or blank
/// values render as empty strings in the prompt.
#[derive(Debug, Default, Deserialize)]
pub struct TripFields {
    pub start_city: Option<String>,
    pub destination_city: Option<String>,
    pub budget_range: Option<String>,
    pub move_month: Option<String>,
    pub context: Option<String>,
}

impl TripFields {
    /// True when at least one field carries a non-empty value.
    pub fn has_any(&self) -> bool {
        [
            &self.start_city,
            &self.destination_city,
            &self.budget_range,
            &self.move_month,
            &self.context,
        ]
        .iter()
        .any(|f| f.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

/// System prompt template for simulation runs.
/// Replace: {start}, {dest}, {budget}, {month}, {context},
///          {scenario_label}, {scenario_bias}
const SIMULATION_SYSTEM_TEMPLATE: &str = r#"ROLE AND GOAL
You are an expert relocation logistics simulator. Your goal is to generate one distinct, realistic simulation for the mover based on the provided inputs and the specified scenario style.

CORE VARIABLES (INPUTS)
- Profile: Not provided explicitly; infer a reasonable baseline family profile unless context specifies otherwise.
- Origin: {start}
- Destination: {dest}
- Budget Range: {budget}
- Ideal Move Month: {month}
- Additional Context: {context}

SIMULATION LOGIC (PROCESS)
For the destination, simulate the full relocation process and estimate both cost and time for:
1) Visa & Immigration (path, docs, processing times, fees)
2) Pet Relocation (requirements, costs, timeline) if relevant
3) Housing (rental process, average rent, deposits, agent fees)
4) Cost of Living Adjustment (salary vs. taxes and expenses)
5) Setup Costs (shipping, flights, temporary housing)
6) Timeline Estimation (Gantt-style phases with dependencies)

SCENARIO STYLE
Scenario: {scenario_label}
Guidance: {scenario_bias}

OUTPUT FORMAT
Return a structured JSON response with:
- headline: Short title for the scenario
- budget_total_usd: Total estimated cost in USD
- timeframe_months: Timeline in months
- phases: Array of phase objects with tasks
- feasibility_score: 1-10 rating
- pros: Array of major advantages
- cons: Array of major disadvantages"#;

/// Fixed user instruction paired with the system template.
const SIMULATION_USER: &str =
    "Using the inputs above, produce the simulation. Be concrete and avoid filler.";

/// Builds the two-message system/user conversation for a simulation run.
/// Pure and deterministic: no I/O, no clock, no randomness.
pub fn build_messages(trip: &TripFields, scenario_key: &str) -> Vec<ChatMessage> {
    let (scenario_label, scenario_bias) = resolve_scenario(scenario_key);

    let system = SIMULATION_SYSTEM_TEMPLATE
        .replace("{start}", field(&trip.start_city))
        .replace("{dest}", field(&trip.destination_city))
        .replace("{budget}", field(&trip.budget_range))
        .replace("{month}", field(&trip.move_month))
        .replace("{context}", field(&trip.context))
        .replace("{scenario_label}", &scenario_label)
        .replace("{scenario_bias}", scenario_bias);

    vec![
        ChatMessage::system(system),
        ChatMessage::user(SIMULATION_USER),
    ]
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}

/// Title casing: first letter of each word upper, rest lower.
/// Word boundaries are any non-alphabetic character.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
