//! Server-mediated backend: verification gate in front of the generator.
//!
//! Composition used by the hosted deployment, where the backend credential
//! never reaches the client. The gate runs first; a rejected or failed
//! verification short-circuits before any generation request is built, and
//! surfaces as `BackendResult::Error` so the game layer cannot distinguish
//! a CAPTCHA failure from a network failure. Only this layer keeps the
//! distinction, in its logs.

use crate::gemini::GeminiClient;
use crate::turnstile::TurnstileVerifier;
use crate::{BackendResult, ProviderError};

/// Gemini client guarded by a Turnstile verification.
#[derive(Debug, Clone)]
pub struct MediatedClient {
    verifier: TurnstileVerifier,
    client: GeminiClient,
}

impl MediatedClient {
    #[must_use]
    pub fn new(verifier: TurnstileVerifier, client: GeminiClient) -> Self {
        Self { verifier, client }
    }

    /// Verify the token, then generate.
    pub async fn generate(&self, token: &str, prompt: &str) -> BackendResult {
        match self.verifier.verify(token).await {
            Ok(()) => self.client.generate(prompt).await,
            Err(ProviderError::VerificationRejected) => {
                tracing::info!("Verification gate rejected the request");
                BackendResult::Error("verification failed".to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Verification gate unavailable");
                BackendResult::Error(format!("verification unavailable: {e}"))
            }
        }
    }
}
