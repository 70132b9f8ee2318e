//! Cloudflare Turnstile verification gate.
//!
//! The server-mediated deployment requires a client-supplied token to be
//! verified before any backend invocation. Verification happens against the
//! siteverify endpoint with a form-encoded `secret` + `response` pair.
//!
//! Stale tokens do not become valid by retrying, so the verifier makes a
//! single attempt.

use serde::Deserialize;

use crate::{ApiKey, ProviderError, http_client, read_capped_error_body};

pub const SITEVERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

const SECRET_ENV: &str = "TURNSTILE_SECRET";

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifier holding the gate secret.
#[derive(Debug, Clone)]
pub struct TurnstileVerifier {
    secret: ApiKey,
    url: String,
}

impl TurnstileVerifier {
    #[must_use]
    pub fn new(secret: ApiKey) -> Self {
        Self {
            secret,
            url: SITEVERIFY_URL.to_string(),
        }
    }

    /// Build from the `TURNSTILE_SECRET` environment variable, the only
    /// place the gate secret is accepted from in deployment.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let secret = std::env::var(SECRET_ENV).ok()?;
        if secret.trim().is_empty() {
            return None;
        }
        Some(Self::new(ApiKey::new(secret)))
    }

    /// Point the verifier at a different endpoint; used by tests.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Verify an opaque client token.
    ///
    /// `Ok(())` means the gate accepted the token. A rejected token is
    /// `ProviderError::VerificationRejected`; transport and status failures
    /// keep their own variants so the request layer can log them apart,
    /// even though they all reach the game as the same error.
    pub async fn verify(&self, token: &str) -> Result<(), ProviderError> {
        let response = http_client()
            .post(&self.url)
            .form(&[
                ("secret", self.secret.expose_secret()),
                ("response", token),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = read_capped_error_body(response).await;
            tracing::warn!(%status, "Turnstile siteverify returned an error status");
            tracing::debug!(%body, "Turnstile error body");
            return Err(ProviderError::Status { status, body });
        }

        let payload: SiteverifyResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Payload(e.to_string()))?;

        if payload.success {
            Ok(())
        } else {
            tracing::info!(codes = ?payload.error_codes, "Turnstile rejected a token");
            Err(ProviderError::VerificationRejected)
        }
    }
}
