//! Google Gemini GenerateContent client.
//!
//! Communicates with
//! `https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent`.
//!
//! Note: the GenerateContent API uses camelCase for `generationConfig` and
//! `safetySettings` fields.
//!
//! # Classification
//!
//! Every call resolves to a [`BackendResult`]:
//!
//! - candidates with text parts → `Text` (parts concatenated)
//! - `promptFeedback.blockReason` with no usable candidate → `Blocked`
//! - a 200 with neither (observed in the wild when the model returns an
//!   empty candidate) → `Text` with a fixed stalling reply, so the turn is
//!   charged like any other non-revealing exchange
//! - transport errors, non-2xx statuses and unparseable payloads → `Error`

use serde_json::{Value, json};

use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};
use crate::{
    ApiKey, BackendResult, GenerationParams, HarmCategory, http_client, read_capped_error_body,
};

pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Reply used when the backend answers 200 with no candidate text and no
/// block reason.
pub const SILENT_REPLY: &str =
    "The AI Warden stares at you silently. Perhaps try a different approach.";

/// Client for one Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: ApiKey,
    model: String,
    base_url: String,
    params: GenerationParams,
    retry: RetryConfig,
}

impl GeminiClient {
    #[must_use]
    pub fn new(api_key: ApiKey, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: API_BASE.to_string(),
            params: GenerationParams::default(),
            retry: RetryConfig::default(),
        }
    }

    /// Point the client at a different endpoint; used by tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Send one adjudication prompt and classify the outcome.
    ///
    /// Infallible by design: every failure mode is folded into
    /// [`BackendResult::Error`] so the game core has exactly one error
    /// branch to handle.
    pub async fn generate(&self, prompt: &str) -> BackendResult {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = build_request_body(prompt, &self.params);
        let client = http_client();

        let outcome = send_with_retry(
            || {
                client
                    .post(&url)
                    .header("x-goog-api-key", self.api_key.expose_secret())
                    .header("content-type", "application/json")
                    .json(&body)
            },
            &self.retry,
        )
        .await;

        let response = match outcome {
            RetryOutcome::Success(resp) => resp,
            RetryOutcome::HttpError(resp) => {
                let status = resp.status();
                let body = read_capped_error_body(resp).await;
                tracing::error!(%status, "Gemini request failed");
                tracing::debug!(%body, "Gemini error body");
                return BackendResult::Error(format!("API error {status}"));
            }
            RetryOutcome::ConnectionError { attempts, source } => {
                tracing::error!(%source, attempts, "Gemini request failed to connect");
                return BackendResult::Error(format!(
                    "request failed after {attempts} attempts: {source}"
                ));
            }
        };

        match response.json::<Value>().await {
            Ok(payload) => classify_response(&payload),
            Err(e) => {
                tracing::warn!(%e, "Gemini response was not valid JSON");
                BackendResult::Error(format!("malformed response payload: {e}"))
            }
        }
    }
}

/// Build the GenerateContent request body.
fn build_request_body(prompt: &str, params: &GenerationParams) -> Value {
    let safety_settings: Vec<Value> = HarmCategory::ALL
        .iter()
        .map(|category| {
            json!({
                "category": category.wire_name(),
                "threshold": params.safety.threshold_for(*category).wire_name(),
            })
        })
        .collect();

    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": prompt }]
            }
        ],
        "generationConfig": {
            "temperature": params.temperature,
            "maxOutputTokens": params.max_output_tokens,
            "topP": params.top_p,
            "topK": params.top_k,
        },
        "safetySettings": safety_settings,
    })
}

/// Classify a 200-status GenerateContent payload.
fn classify_response(payload: &Value) -> BackendResult {
    if let Some(parts) = payload
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
    {
        let mut text = String::new();
        for part in parts {
            if let Some(fragment) = part.get("text").and_then(Value::as_str) {
                text.push_str(fragment);
            }
        }
        if !text.trim().is_empty() {
            return BackendResult::Text(text);
        }
    }

    if let Some(reason) = payload
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        tracing::debug!(reason, "Gemini blocked the prompt");
        return BackendResult::Blocked;
    }

    // 200 with nothing usable. Charge the turn with a stalling reply rather
    // than refunding it; an empty answer is still an answer.
    tracing::debug!("Gemini returned no candidate text and no block reason");
    BackendResult::Text(SILENT_REPLY.to_string())
}
