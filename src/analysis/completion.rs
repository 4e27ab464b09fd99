use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::analysis::prompt::build_analysis_prompt;
use crate::analysis::structurer::structure;
use crate::llm::LLMAdapter;
use crate::models::AnalysisResult;
use crate::types::{CompletionError, LLMMessage, LLMRequest};

/// Generation method a discovered model must support.
const GENERATE_METHOD: &str = "generateContent";

/// Sends document text to the model and shapes the answer.
///
/// Model selection is an ordered attempt-then-discover strategy: the
/// preferred candidates are tried in order, skipping any the provider does
/// not know; if none exist, the provider's own model listing is consulted.
pub struct CompletionClient {
    adapter: Arc<dyn LLMAdapter>,
    candidate_models: Vec<String>,
    max_output_tokens: Option<u32>,
}

impl CompletionClient {
    pub fn new(adapter: Arc<dyn LLMAdapter>, candidate_models: Vec<String>) -> Self {
        Self {
            adapter,
            candidate_models,
            max_output_tokens: None,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn candidate_models(&self) -> &[String] {
        &self.candidate_models
    }

    async fn complete_with(&self, model: &str, prompt: &str) -> Result<String, CompletionError> {
        let request = LLMRequest {
            model: model.to_string(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: self.max_output_tokens,
            temperature: None,
        };

        let response = self.adapter.create_chat_completion(&request).await?;
        info!(
            model,
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            response_len = response.content.len(),
            "Completion received"
        );
        Ok(response.content)
    }

    /// First model the provider lists as supporting text generation.
    async fn discover_model(&self) -> Result<String, CompletionError> {
        let models = self.adapter.list_models().await?;
        debug!(available = models.len(), "Listed provider models");

        models
            .into_iter()
            .find(|m| m.supports(GENERATE_METHOD))
            .map(|m| m.name)
            .ok_or(CompletionError::NoModelAvailable)
    }

    /// Raw completion text for `text`, verbatim.
    pub async fn complete(&self, text: &str) -> Result<String, CompletionError> {
        let prompt = build_analysis_prompt(text);

        for model in &self.candidate_models {
            match self.complete_with(model, &prompt).await {
                Err(CompletionError::ModelNotFound(_)) => {
                    warn!(model = %model, "Candidate model unavailable, trying next");
                }
                other => return other,
            }
        }

        let model = self.discover_model().await?;
        info!(model = %model, "Using discovered model");
        self.complete_with(&model, &prompt).await
    }

    /// Analyze `text`; completion failures become a degraded result rather
    /// than an error.
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        match self.complete(text).await {
            Ok(raw) => structure(&raw),
            Err(e) => {
                error!(error = %e, "Completion failed, returning degraded analysis");
                AnalysisResult::degraded(&e)
            }
        }
    }
}
