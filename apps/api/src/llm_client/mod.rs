/// LLM Client — the single point of entry for all OpenAI API calls.
///
/// ARCHITECTURAL RULE: No other module may call the provider directly.
/// All LLM interactions MUST go through this module.
///
/// Two call paths exist: the Responses API (primary) and chat completions
/// (fallback for older models/configs). Neither path retries — a failed
/// round trip surfaces immediately to the handler, which owns the one
/// documented fallback transition.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod extract;

const RESPONSES_API_URL: &str = "https://api.openai.com/v1/responses";
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LlmError {
    /// True for the one upstream rejection kind that the timeline route is
    /// allowed to retry through the chat completions path.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, LlmError::Api { status: 400, .. })
    }
}

/// One role/content message in provider wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [ChatMessage],
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Decoded Responses API body.
///
/// The provider does not keep one stable output shape across models and
/// versions: the payload may arrive as an aggregated text field, as typed
/// content parts, or in neither. Every field is therefore optional and the
/// extractor probes them in order.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsesBody {
    pub output_text: Option<String>,
    pub output: Option<Vec<OutputItem>>,
}

#[derive(Debug, Deserialize)]
pub struct OutputItem {
    pub content: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub part_type: Option<String>,
    pub json: Option<Value>,
    pub text: Option<String>,
}

/// A Responses API result: the decoded body plus the raw text it was decoded
/// from. The raw text feeds the extractor's substring-scan fallback.
#[derive(Debug)]
pub struct LlmResponse {
    pub body: ResponsesBody,
    pub raw: String,
}

impl LlmResponse {
    /// Wraps a bare content string (chat completions output) so the same
    /// extraction tiers apply to both call paths.
    pub fn from_text(text: String) -> Self {
        Self {
            body: ResponsesBody {
                output_text: Some(text.clone()),
                output: None,
            },
            raw: text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Empty choices or a null message degrade to an empty JSON object, which
/// downstream validation rejects cleanly.
fn first_choice_content(parsed: ChatResponse) -> String {
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_else(|| "{}".to_string())
}

/// The single LLM client shared by all routes.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Calls the Responses API once. The decoded body is best-effort: a body
    /// that fails to decode still reaches the extractor through the raw text.
    pub async fn respond(&self, messages: &[ChatMessage]) -> Result<LlmResponse, LlmError> {
        let request_body = ResponsesRequest {
            model: &self.model,
            input: messages,
        };

        let raw = self.post(RESPONSES_API_URL, &request_body).await?;
        let body: ResponsesBody = serde_json::from_str(&raw).unwrap_or_default();
        Ok(LlmResponse { body, raw })
    }

    /// Calls the chat completions API once and returns the first choice's
    /// message content.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages,
        };

        let raw = self.post(CHAT_COMPLETIONS_URL, &request_body).await?;
        let parsed: ChatResponse = serde_json::from_str(&raw)?;
        Ok(first_choice_content(parsed))
    }

    async fn post<T: Serialize>(&self, url: &str, body: &T) -> Result<String, LlmError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Surface the provider's message when its error envelope parses
            let message = serde_json::from_str::<OpenAiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            warn!("LLM API returned {status}: {message}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("LLM call to {url} succeeded ({} bytes)", text.len());
        Ok(text)
    }
}
