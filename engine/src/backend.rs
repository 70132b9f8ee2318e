//! Seam between the orchestrator and the generation backend.

use warden_providers::gemini::GeminiClient;
use warden_types::BackendResult;

/// A text-generation backend the orchestrator can adjudicate against.
///
/// Implementations are infallible: transport failures, HTTP errors and
/// verification failures must already be folded into
/// [`BackendResult::Error`]. That keeps the orchestrator's failure handling
/// to a single branch and guarantees no fault propagates to the caller.
pub trait GenerationBackend: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = BackendResult> + Send;
}

impl GenerationBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> BackendResult {
        GeminiClient::generate(self, prompt).await
    }
}
