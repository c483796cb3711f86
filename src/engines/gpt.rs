//! Completion-backed translation engine.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{apply_filter, parse_choices, Engine};
use crate::backend::{CompletionBackend, CompletionRequest};
use crate::error::{Error, Result};
use crate::filters::Filter;
use crate::prompt::PromptTemplate;
use crate::result::TranslationResult;

/// Default model allow-list. An open set, not a closed enum: callers
/// add new models with [`GptConfig::with_supported_models`] without
/// touching this crate.
const DEFAULT_SUPPORTED_MODELS: &[&str] = &["gpt-3", "gpt-3.5", "gpt-4", "text-davinci-003"];

/// Configuration for [`GptEngine`], immutable after construction.
#[derive(Debug, Clone)]
pub struct GptConfig {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum tokens per completion
    pub max_tokens: u32,
    /// Number of choices to request
    pub num_choices: u32,
    /// Stop sequences
    pub stop: Vec<String>,
    /// Models this engine accepts
    pub supported_models: BTreeSet<String>,
    /// If set, the backend client must report exactly this API version
    pub expected_api_version: Option<String>,
}

impl GptConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.5,
            max_tokens: 200,
            num_choices: 3,
            stop: vec!["\n\n".to_string()],
            supported_models: DEFAULT_SUPPORTED_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            expected_api_version: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_num_choices(mut self, n: u32) -> Self {
        self.num_choices = n.max(1);
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }

    /// Replace the model allow-list.
    pub fn with_supported_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Pin the backend client API version.
    pub fn with_expected_api_version(mut self, version: impl Into<String>) -> Self {
        self.expected_api_version = Some(version.into());
        self
    }
}

/// Translation engine backed by a text-completion service.
///
/// Owns its backend client and prompt template; everything is validated
/// once in [`new`](Self::new) and read-only afterwards, so a single
/// engine can serve concurrent `translate` calls.
pub struct GptEngine {
    backend: Arc<dyn CompletionBackend>,
    config: GptConfig,
    prompt: PromptTemplate,
}

impl GptEngine {
    /// Construct and validate an engine.
    ///
    /// Checks run once, before any translation is possible: the model
    /// must be in the allow-list and, when a version is pinned, the
    /// backend client must report it. No partially-valid engine is ever
    /// returned.
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        config: GptConfig,
        prompt: PromptTemplate,
    ) -> Result<Self> {
        if !config.supported_models.contains(&config.model) {
            return Err(Error::unsupported_model(&config.model));
        }
        if let Some(expected) = &config.expected_api_version {
            let found = backend.api_version();
            if found != expected.as_str() {
                return Err(Error::incompatible_dependency(expected.clone(), found));
            }
        }

        Ok(Self {
            backend,
            config,
            prompt,
        })
    }

    pub fn config(&self) -> &GptConfig {
        &self.config
    }
}

impl std::fmt::Debug for GptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GptEngine")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .field("prompt", &self.prompt)
            .finish()
    }
}

#[async_trait]
impl Engine for GptEngine {
    async fn translate(
        &self,
        utterance: &str,
        filter: Option<&dyn Filter>,
    ) -> Result<TranslationResult> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt: self.prompt.render(utterance),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            n: self.config.num_choices,
            stop: self.config.stop.clone(),
        };

        let response = self.backend.complete(request).await?;
        debug!(
            backend = self.backend.name(),
            choices = response.choices.len(),
            "received completion response"
        );

        let candidates = parse_choices(&response)?;
        let result = TranslationResult::from_candidates(candidates)?;
        Ok(apply_filter(result, filter))
    }
}
