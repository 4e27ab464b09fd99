use std::sync::Arc;

use crate::analysis::CompletionClient;
use crate::config::Config;
use crate::llm::{GoogleAdapter, LLMAdapter};
use crate::storage::UploadStore;
use crate::types::{AppResult, CompletionError};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub completion: Arc<CompletionClient>,
    pub uploads: UploadStore,
}

impl AppState {
    /// Wire the service from configuration, talking to the Gemini API.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let adapter = Arc::new(GoogleAdapter::from_config(&config.llm)?);
        Ok(Self::with_adapter(config, adapter))
    }

    /// Wire the service around an arbitrary text-generation backend.
    pub fn with_adapter(config: Config, adapter: Arc<dyn LLMAdapter>) -> Self {
        let completion = CompletionClient::new(adapter, config.llm.candidate_models.clone())
            .with_max_output_tokens(config.llm.max_output_tokens);
        let uploads = UploadStore::new(&config.upload.dir);

        Self {
            config,
            completion: Arc::new(completion),
            uploads,
        }
    }
}

/// A file received on `POST /analyze/`; lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: bytes::Bytes,
}

/// Structured summary of one document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub key_clauses: Vec<String>,
    pub risks: Vec<String>,
    pub next_steps: Vec<String>,
}

pub const DEGRADED_KEY_CLAUSE: &str =
    "Analysis failed - please check your API key and internet connection";
pub const DEGRADED_RISK: &str = "Unable to process document with AI";
pub const DEGRADED_NEXT_STEPS: [&str; 2] = [
    "Verify Gemini API key is valid",
    "Check document format and try again",
];

impl AnalysisResult {
    /// Well-formed result describing a failed completion.
    pub fn degraded(error: &CompletionError) -> Self {
        Self {
            summary: format!("Error analyzing document: {}", error),
            key_clauses: vec![DEGRADED_KEY_CLAUSE.to_string()],
            risks: vec![DEGRADED_RISK.to_string()],
            next_steps: DEGRADED_NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// API Request/Response types

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct AnalyzeResponse {
    pub filename: String,
    pub analysis: AnalysisResult,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct AckResponse {
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_embeds_error() {
        let error = CompletionError::Auth("API key not valid".to_string());
        let result = AnalysisResult::degraded(&error);

        assert_eq!(
            result.summary,
            "Error analyzing document: authentication failed: API key not valid"
        );
        assert_eq!(result.key_clauses, vec![DEGRADED_KEY_CLAUSE]);
        assert_eq!(result.risks, vec![DEGRADED_RISK]);
        assert_eq!(result.next_steps, DEGRADED_NEXT_STEPS.to_vec());
    }

    #[test]
    fn test_analyze_response_shape() {
        let response = AnalyzeResponse {
            filename: "lease.pdf".to_string(),
            analysis: AnalysisResult {
                summary: "A lease.".to_string(),
                key_clauses: vec!["Rent".to_string()],
                risks: vec!["Late fees".to_string()],
                next_steps: vec!["Sign".to_string()],
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "filename": "lease.pdf",
                "analysis": {
                    "summary": "A lease.",
                    "key_clauses": ["Rent"],
                    "risks": ["Late fees"],
                    "next_steps": ["Sign"]
                }
            })
        );
    }
}
