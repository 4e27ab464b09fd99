use async_trait::async_trait;
use crate::types::{CompletionError, LLMRequest, LLMResponse, ModelInfo};

/// A text-generation backend.
///
/// Implementations map transport and HTTP failures onto [`CompletionError`]
/// so callers can tell an unknown model apart from a bad key or a rate limit.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: &LLMRequest,
    ) -> Result<LLMResponse, CompletionError>;

    /// Models the provider currently offers.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, CompletionError>;
}
