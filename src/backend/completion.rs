//! Text-completion backend trait and the OpenAI implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Configuration for HTTP backends.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// API key
    pub api_key: String,
    /// Base URL override
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: 60,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// A normalized completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Full prompt text
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Number of choices to request
    pub n: u32,
    /// Stop sequences
    pub stop: Vec<String>,
}

/// One choice in a normalized completion response.
///
/// Exactly one of `probability` / `logprob` is usually present; the
/// output parser prefers `probability` and falls back to exponentiating
/// `logprob`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionChoice {
    /// Generated text
    pub text: String,
    /// Cumulative log-probability of the generated tokens
    pub logprob: Option<f64>,
    /// Directly provided probability, if the backend exposes one
    pub probability: Option<f64>,
}

/// A normalized completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Model that produced the response
    pub model: String,
    /// Ranked choices, backend order preserved
    pub choices: Vec<CompletionChoice>,
    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

/// Text-completion backend.
///
/// One `complete` call maps to exactly one outbound request; retry and
/// backoff policy, if any, lives behind this trait, never above it.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete a prompt.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Backend name, used in error messages.
    fn name(&self) -> &str;

    /// Wire API version this client speaks. Engines that pin a version
    /// compare against this at construction time.
    fn api_version(&self) -> &str;
}

pub(super) fn map_transport_error(backend: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::BackendTimeout(format!("{}: {}", backend, err))
    } else if err.is_connect() {
        Error::BackendUnavailable(format!("{}: {}", backend, err))
    } else {
        Error::backend(backend, err.to_string())
    }
}

/// OpenAI legacy completions client.
pub struct OpenAiBackend {
    config: BackendConfig,
    http: Client,
}

impl OpenAiBackend {
    const DEFAULT_BASE_URL: &'static str = "https://api.openai.com";
    const API_VERSION: &'static str = "v1";
    const NAME: &'static str = "openai";

    pub fn new(config: BackendConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { config, http }
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(Self::DEFAULT_BASE_URL)
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    prompt: String,
    temperature: f64,
    max_tokens: u32,
    n: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    logprobs: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: String,
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    text: String,
    logprobs: Option<OpenAiLogprobs>,
}

#[derive(Debug, Deserialize)]
struct OpenAiLogprobs {
    #[serde(default)]
    token_logprobs: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_request = OpenAiRequest {
            model: request.model,
            prompt: request.prompt,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            n: request.n,
            stop: request.stop,
            logprobs: 1,
        };

        let url = format!("{}/{}/completions", self.base_url(), Self::API_VERSION);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| map_transport_error(Self::NAME, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(Self::NAME, e))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<OpenAiError>(&body) {
                return Err(Error::backend(Self::NAME, error.error.message));
            }
            return Err(Error::backend(Self::NAME, format!("{}: {}", status, body)));
        }

        let api_response: OpenAiResponse = serde_json::from_str(&body)
            .map_err(|e| Error::backend(Self::NAME, format!("malformed response: {}", e)))?;

        let choices = api_response
            .choices
            .into_iter()
            .map(|choice| {
                // Sum of token logprobs is the cumulative log-likelihood
                // of the whole completion.
                let logprob = choice.logprobs.map(|lp| {
                    lp.token_logprobs.iter().flatten().sum::<f64>()
                });
                CompletionChoice {
                    text: choice.text,
                    logprob,
                    probability: None,
                }
            })
            .collect();

        Ok(CompletionResponse {
            model: api_response.model,
            choices,
            timestamp: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn api_version(&self) -> &str {
        Self::API_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_builder() {
        let config = BackendConfig::new("test-key")
            .with_base_url("https://custom.api.com")
            .with_timeout(30);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, Some("https://custom.api.com".to_string()));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_openai_base_url_override() {
        let backend =
            OpenAiBackend::new(BackendConfig::new("k").with_base_url("http://localhost:9999"));
        assert_eq!(backend.base_url(), "http://localhost:9999");
        assert_eq!(backend.api_version(), "v1");
    }

    #[test]
    fn test_openai_response_deserialization() {
        let body = r#"{
            "model": "text-davinci-003",
            "choices": [
                {"text": " F(grant)", "logprobs": {"token_logprobs": [-0.1, -0.2, null]}},
                {"text": " G(a)", "logprobs": null}
            ]
        }"#;
        let parsed: OpenAiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices.len(), 2);
        let logprob: f64 = parsed.choices[0]
            .logprobs
            .as_ref()
            .unwrap()
            .token_logprobs
            .iter()
            .flatten()
            .sum();
        assert!((logprob + 0.3).abs() < 1e-9);
    }
}
