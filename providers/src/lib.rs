//! HTTP clients for the warden game's external collaborators.
//!
//! # Architecture
//!
//! Two collaborators live behind this crate:
//!
//! - [`gemini`] - Google Gemini GenerateContent client. Classifies every
//!   outcome into a [`BackendResult`]: generated text, a safety-filter
//!   block, or an error. The game core never sees a transport-level type.
//! - [`turnstile`] - Cloudflare Turnstile verification gate, used by the
//!   server-mediated deployment. [`mediated`] composes the two: a rejected
//!   token fails the call before any backend invocation and surfaces as
//!   `BackendResult::Error`, indistinguishable from a network failure at
//!   the game-logic layer.
//!
//! # Error Handling
//!
//! [`ProviderError`] is internal to this crate's plumbing; the public
//! generate entry points are infallible and return [`BackendResult`]
//! directly, so callers cannot forget to handle a failure branch.

pub mod gemini;
pub mod mediated;
pub mod retry;
pub mod turnstile;

use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gemini::{GeminiClient, SILENT_REPLY};
pub use mediated::MediatedClient;
pub use retry::RetryConfig;
pub use turnstile::TurnstileVerifier;
pub use warden_types::BackendResult;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 100;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Shared HTTP client with hardened defaults.
///
/// No redirects, bounded connect timeout, TCP keepalive and a warm
/// connection pool. TLS-only enforcement is left to the URL scheme so the
/// wiremock-based tests can point at a local plain-HTTP listener.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build hardened HTTP client: {e}. Using defaults.");
                reqwest::Client::new()
            })
    })
}

/// Read an error response body, capped so a hostile or broken server cannot
/// balloon memory or logs.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(mut body) => {
            if body.len() > MAX_ERROR_BODY_BYTES {
                // Truncate on a char boundary.
                let mut cut = MAX_ERROR_BODY_BYTES;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
                body.push_str("...(truncated)");
            }
            body
        }
        Err(e) => format!("<unreadable body: {e}>"),
    }
}

/// Internal plumbing errors, folded into `BackendResult::Error` before they
/// reach the game core.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed response payload: {0}")]
    Payload(String),
    #[error("verification rejected")]
    VerificationRejected,
}

/// An API credential with redacted `Debug`, so neither the backend key nor
/// the verification-gate secret can leak through logs.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Deliberately named so every read of the credential is visible at
    /// the call site.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

// ============================================================================
// Generation parameters
// ============================================================================

/// Content-safety category recognized by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmCategory {
    Harassment,
    HateSpeech,
    SexuallyExplicit,
    DangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];

    /// Wire name used by the GenerateContent API.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            HarmCategory::Harassment => "HARM_CATEGORY_HARASSMENT",
            HarmCategory::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
            HarmCategory::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            HarmCategory::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
        }
    }
}

/// How aggressively a safety category blocks content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockThreshold {
    BlockMost,
    #[default]
    BlockSome,
    BlockFew,
    BlockNone,
}

impl BlockThreshold {
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            BlockThreshold::BlockMost => "BLOCK_LOW_AND_ABOVE",
            BlockThreshold::BlockSome => "BLOCK_MEDIUM_AND_ABOVE",
            BlockThreshold::BlockFew => "BLOCK_ONLY_HIGH",
            BlockThreshold::BlockNone => "BLOCK_NONE",
        }
    }
}

/// Per-category safety thresholds, each independently configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetySettings {
    pub harassment: BlockThreshold,
    pub hate_speech: BlockThreshold,
    pub sexually_explicit: BlockThreshold,
    pub dangerous_content: BlockThreshold,
}

impl SafetySettings {
    #[must_use]
    pub const fn threshold_for(&self, category: HarmCategory) -> BlockThreshold {
        match category {
            HarmCategory::Harassment => self.harassment,
            HarmCategory::HateSpeech => self.hate_speech,
            HarmCategory::SexuallyExplicit => self.sexually_explicit,
            HarmCategory::DangerousContent => self.dangerous_content,
        }
    }
}

/// Sampling and output parameters for the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub top_p: f64,
    pub top_k: u32,
    pub safety: SafetySettings,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 800,
            top_p: 0.95,
            top_k: 40,
            safety: SafetySettings::default(),
        }
    }
}
