// Timeline extraction: schema types, numeric normalization, prompts, and
// the /api/timeline handler with its one-shot chat fallback.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod models;
pub mod normalize;
pub mod prompts;
