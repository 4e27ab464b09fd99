// Google Gemini adapter (Generative Language REST API, API key auth)
// API Reference: https://ai.google.dev/api/generate-content
//
// The key is sent in the x-goog-api-key header for every call, including the
// model listing, so it never appears in a URL.

use crate::config::LLMConfig;
use crate::llm::provider::LLMAdapter;
use crate::types::{
    AppError, AppResult, CompletionError, LLMMessage, LLMRequest, LLMResponse, ModelInfo,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_VERSION: &str = "v1beta";

pub struct GoogleAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

// Request types for the Gemini API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// Response types for the Gemini API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<GeminiModel>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GoogleAdapter {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        Self::new(
            &config.google_api_key,
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Model path segment; accepts both `gemini-pro` and `models/gemini-pro`.
    fn model_path(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/{}/{}:generateContent",
            self.base_url,
            API_VERSION,
            Self::model_path(model)
        )
    }

    fn models_url(&self) -> String {
        format!("{}/{}/models", self.base_url, API_VERSION)
    }

    fn convert_message(msg: &LLMMessage) -> GeminiContent {
        let role = match msg.role.as_str() {
            "assistant" | "model" => "model",
            _ => "user",
        };
        GeminiContent {
            role: Some(role.to_string()),
            parts: vec![GeminiPart {
                text: Some(msg.content.clone()),
            }],
        }
    }

    fn transport_error(e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Network(format!("request timed out: {}", e))
        } else {
            CompletionError::Network(e.to_string())
        }
    }

    /// Map a non-success response onto a failure kind.
    fn classify_error(status: StatusCode, body: &str, model: Option<&str>) -> CompletionError {
        let parsed = serde_json::from_str::<GeminiErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .map(|r| r.error.message.clone())
            .unwrap_or_else(|| body.to_string());
        let api_status = parsed.and_then(|r| r.error.status).unwrap_or_default();

        match status.as_u16() {
            401 | 403 => CompletionError::Auth(message),
            // An invalid key comes back as 400 INVALID_ARGUMENT
            400 if message.contains("API key") => CompletionError::Auth(message),
            404 => CompletionError::ModelNotFound(model.unwrap_or("unknown").to_string()),
            429 => CompletionError::RateLimited(message),
            _ if api_status == "RESOURCE_EXHAUSTED" => CompletionError::RateLimited(message),
            code => CompletionError::Api { status: code, message },
        }
    }

    /// One page of `GET /models`; `page_token` is the previous page's `nextPageToken`.
    async fn list_models_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<GeminiModelList, CompletionError> {
        let mut builder = self
            .client
            .get(self.models_url())
            .header("x-goog-api-key", &self.api_key);
        if let Some(token) = page_token {
            builder = builder.query(&[("pageToken", token)]);
        }

        let response = builder.send().await.map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::classify_error(status, &error_text, None));
        }

        response.json().await.map_err(|e| {
            CompletionError::InvalidResponse(format!("failed to parse model list: {}", e))
        })
    }
}

#[async_trait]
impl LLMAdapter for GoogleAdapter {
    async fn create_chat_completion(
        &self,
        request: &LLMRequest,
    ) -> Result<LLMResponse, CompletionError> {
        let body = GeminiRequest {
            contents: request.messages.iter().map(Self::convert_message).collect(),
            generation_config: if request.temperature.is_some() || request.max_tokens.is_some() {
                Some(GeminiGenerationConfig {
                    temperature: request.temperature,
                    max_output_tokens: request.max_tokens,
                })
            } else {
                None
            },
        };

        debug!(model = %request.model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(self.generate_url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::classify_error(status, &error_text, Some(&request.model)));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            CompletionError::InvalidResponse(format!("failed to parse Gemini response: {}", e))
        })?;

        let candidate = gemini_response
            .candidates
            .first()
            .ok_or_else(|| {
                CompletionError::InvalidResponse("Gemini returned no candidates".to_string())
            })?;

        // Like the SDK's `response.text`: every text part of the first candidate
        let content: String = candidate
            .content
            .as_ref()
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(CompletionError::InvalidResponse(format!(
                "Gemini candidate had no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let usage = gemini_response
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(LLMResponse {
            content,
            model: request.model.clone(),
            finish_reason: candidate.finish_reason.clone().unwrap_or_else(|| "STOP".to_string()),
            usage,
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, CompletionError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_models_page(page_token.as_deref()).await?;
            models.extend(page.models.into_iter().map(|m| ModelInfo {
                name: m.name,
                supported_generation_methods: m.supported_generation_methods,
            }));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}
