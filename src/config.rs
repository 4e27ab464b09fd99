use anyhow::{bail, Context, Result};
use std::env;

use crate::extraction::ExtensionPolicy;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Preference order used when `GEMINI_MODELS` is not set.
pub const DEFAULT_CANDIDATE_MODELS: [&str; 4] = [
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-pro",
    "models/gemini-1.5-flash",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Clone)]
pub struct LLMConfig {
    pub google_api_key: String,
    pub api_base_url: String,
    pub candidate_models: Vec<String>,
    pub request_timeout_secs: u64,
    pub max_output_tokens: Option<u32>,
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field(
                "google_api_key",
                &if self.google_api_key.is_empty() { "<unset>" } else { "<redacted>" },
            )
            .field("api_base_url", &self.api_base_url)
            .field("candidate_models", &self.candidate_models)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: String,
    pub max_bytes: usize,
    pub unsupported_extension_policy: ExtensionPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let candidate_models = match lookup("GEMINI_MODELS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_CANDIDATE_MODELS.iter().map(|s| s.to_string()).collect(),
        };

        let policy = var_or("UNSUPPORTED_EXTENSION_POLICY", "text");
        let unsupported_extension_policy = match policy.trim().to_lowercase().as_str() {
            "text" | "plain" | "plain_text" => ExtensionPolicy::TreatAsText,
            "reject" => ExtensionPolicy::Reject,
            other => bail!(
                "UNSUPPORTED_EXTENSION_POLICY must be 'text' or 'reject', got '{}'",
                other
            ),
        };

        Ok(Self {
            server: ServerConfig {
                port: var_or("PORT", "8000")
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: var_or("HOST", "0.0.0.0"),
            },
            llm: LLMConfig {
                google_api_key: lookup("GEMINI_API_KEY")
                    .or_else(|| lookup("GOOGLE_API_KEY"))
                    .unwrap_or_default(),
                api_base_url: var_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
                candidate_models,
                request_timeout_secs: var_or("LLM_REQUEST_TIMEOUT_SECS", "120")
                    .parse()
                    .context("LLM_REQUEST_TIMEOUT_SECS must be an integer")?,
                max_output_tokens: lookup("LLM_MAX_OUTPUT_TOKENS")
                    .map(|v| v.parse())
                    .transpose()
                    .context("LLM_MAX_OUTPUT_TOKENS must be an integer")?,
            },
            upload: UploadConfig {
                dir: var_or("UPLOAD_DIR", "uploads"),
                max_bytes: var_or("MAX_UPLOAD_BYTES", "26214400")
                    .parse()
                    .context("MAX_UPLOAD_BYTES must be an integer")?,
                unsupported_extension_policy,
            },
        })
    }
}
