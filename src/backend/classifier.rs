//! Intent-classifier backend trait and the Rasa implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::completion::{map_transport_error, BackendConfig};
use crate::error::{Error, Result};

/// One intent in a classifier ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentPrediction {
    /// Intent name
    pub intent: String,
    /// Classifier confidence, already in [0, 1]
    pub confidence: f64,
}

/// Intent-classification backend.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Rank intents for an utterance, best first.
    async fn classify(&self, utterance: &str) -> Result<Vec<IntentPrediction>>;

    /// Backend name, used in error messages.
    fn name(&self) -> &str;
}

/// Rasa NLU server client.
pub struct RasaBackend {
    config: BackendConfig,
    http: Client,
}

impl RasaBackend {
    const DEFAULT_BASE_URL: &'static str = "http://localhost:5005";
    const NAME: &'static str = "rasa";

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

// Rasa API types
#[derive(Debug, Serialize)]
struct RasaParseRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RasaParseResponse {
    #[serde(default)]
    intent_ranking: Vec<RasaIntent>,
}

#[derive(Debug, Deserialize)]
struct RasaIntent {
    name: String,
    confidence: f64,
}

#[async_trait]
impl IntentClassifier for RasaBackend {
    async fn classify(&self, utterance: &str) -> Result<Vec<IntentPrediction>> {
        let url = format!("{}/model/parse", self.base_url());

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&RasaParseRequest { text: utterance })
            .send()
            .await
            .map_err(|e| map_transport_error(Self::NAME, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::backend(Self::NAME, e.to_string()))?;

        if !status.is_success() {
            return Err(Error::backend(Self::NAME, format!("{}: {}", status, body)));
        }

        let parsed: RasaParseResponse = serde_json::from_str(&body)
            .map_err(|e| Error::backend(Self::NAME, format!("malformed response: {}", e)))?;

        Ok(parsed
            .intent_ranking
            .into_iter()
            .map(|intent| IntentPrediction {
                intent: intent.name,
                confidence: intent.confidence,
            })
            .collect())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasa_response_deserialization() {
        let body = r#"{
            "intent": {"name": "respondedExistence", "confidence": 0.91},
            "intent_ranking": [
                {"name": "respondedExistence", "confidence": 0.91},
                {"name": "response", "confidence": 0.06}
            ],
            "text": "send a slack after a gmail"
        }"#;
        let parsed: RasaParseResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.intent_ranking.len(), 2);
        assert_eq!(parsed.intent_ranking[0].name, "respondedExistence");
    }

    #[test]
    fn test_rasa_default_base_url() {
        let backend = RasaBackend::new(BackendConfig::new(""));
        assert_eq!(backend.base_url(), "http://localhost:5005");
    }
}
