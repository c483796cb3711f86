//! Intent-classifier-backed translation engine.
//!
//! Classifiers do not emit formula text; they rank a fixed set of
//! intents. The engine carries an intent → formula template table,
//! parsed eagerly at construction, and turns a classifier ranking into
//! candidates by looking each predicted intent up in that table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{apply_filter, Engine};
use crate::backend::IntentClassifier;
use crate::error::{Error, Result};
use crate::filters::Filter;
use crate::result::{Candidate, TranslationResult};
use crate::syntax::{parse_formula, Formula};

/// Configuration for [`ClassifierEngine`].
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfig {
    templates: HashMap<String, String>,
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an intent name to a formula template.
    pub fn with_template(
        mut self,
        intent: impl Into<String>,
        formula: impl Into<String>,
    ) -> Self {
        self.templates.insert(intent.into(), formula.into());
        self
    }

    pub fn with_templates<I, K, V>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.templates
            .extend(templates.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

/// Translation engine backed by an intent classifier.
pub struct ClassifierEngine {
    backend: Arc<dyn IntentClassifier>,
    templates: HashMap<String, Formula>,
}

impl ClassifierEngine {
    /// Construct and validate an engine.
    ///
    /// Every configured template must parse against the formula grammar
    /// and the table must be non-empty; either failure aborts
    /// construction with a configuration error.
    pub fn new(backend: Arc<dyn IntentClassifier>, config: ClassifierConfig) -> Result<Self> {
        if config.templates.is_empty() {
            return Err(Error::config("classifier engine has no intent templates"));
        }

        let mut templates = HashMap::with_capacity(config.templates.len());
        for (intent, text) in config.templates {
            let formula = parse_formula(&text).map_err(|e| {
                Error::config(format!(
                    "template for intent '{}' is not a valid formula: {}",
                    intent, e
                ))
            })?;
            templates.insert(intent, formula);
        }

        Ok(Self { backend, templates })
    }
}

impl std::fmt::Debug for ClassifierEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierEngine")
            .field("backend", &self.backend.name())
            .field("templates", &self.templates)
            .finish()
    }
}

#[async_trait]
impl Engine for ClassifierEngine {
    async fn translate(
        &self,
        utterance: &str,
        filter: Option<&dyn Filter>,
    ) -> Result<TranslationResult> {
        let predictions = self.backend.classify(utterance).await?;
        if predictions.is_empty() {
            return Err(Error::EmptyResponse);
        }

        let mut candidates = Vec::with_capacity(predictions.len());
        for prediction in predictions {
            match self.templates.get(&prediction.intent) {
                Some(formula) => {
                    candidates.push(Candidate::new(formula.canonical(), prediction.confidence));
                }
                None => {
                    debug!(intent = %prediction.intent, "no template for predicted intent");
                }
            }
        }
        if candidates.is_empty() {
            return Err(Error::EmptyResponse);
        }

        let result = TranslationResult::from_candidates(candidates)?;
        Ok(apply_filter(result, filter))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::backend::IntentPrediction;

    struct StaticClassifier {
        ranking: Vec<IntentPrediction>,
    }

    #[async_trait]
    impl IntentClassifier for StaticClassifier {
        async fn classify(&self, _utterance: &str) -> Result<Vec<IntentPrediction>> {
            Ok(self.ranking.clone())
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    fn prediction(intent: &str, confidence: f64) -> IntentPrediction {
        IntentPrediction {
            intent: intent.to_string(),
            confidence,
        }
    }

    fn config() -> ClassifierConfig {
        ClassifierConfig::new()
            .with_template("response", "G(gmail -> F(slack))")
            .with_template("existence", "F(slack)")
    }

    #[test]
    fn test_empty_template_table_is_config_error() {
        let backend = Arc::new(StaticClassifier { ranking: vec![] });
        let err = ClassifierEngine::new(backend, ClassifierConfig::new()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unparseable_template_is_config_error() {
        let backend = Arc::new(StaticClassifier { ranking: vec![] });
        let config = ClassifierConfig::new().with_template("broken", "G(a ->");
        let err = ClassifierEngine::new(backend, config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_engine_is_debuggable() {
        // `Result<ClassifierEngine>` assertions in tests rely on this impl.
        let backend = Arc::new(StaticClassifier { ranking: vec![] });
        let engine = ClassifierEngine::new(backend, config()).unwrap();
        let rendered = format!("{:?}", engine);
        assert!(rendered.contains("ClassifierEngine"));
        assert!(rendered.contains("static"));
    }

    #[tokio::test]
    async fn test_ranking_maps_through_templates() {
        let backend = Arc::new(StaticClassifier {
            ranking: vec![
                prediction("response", 0.75),
                prediction("existence", 0.25),
            ],
        });
        let engine = ClassifierEngine::new(backend, config()).unwrap();

        let result = engine
            .translate("send a slack after a gmail", None)
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        let best = result.best().unwrap();
        assert_eq!(best.0, parse_formula("G(gmail -> F(slack))").unwrap());
        assert!((best.1 - 0.75).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_intents_are_skipped() {
        let backend = Arc::new(StaticClassifier {
            ranking: vec![
                prediction("nlu_fallback", 0.9),
                prediction("existence", 0.1),
            ],
        });
        let engine = ClassifierEngine::new(backend, config()).unwrap();

        let result = engine.translate("whatever", None).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.best().unwrap().0,
            parse_formula("F(slack)").unwrap()
        );
    }

    #[tokio::test]
    async fn test_empty_ranking_is_empty_response() {
        let backend = Arc::new(StaticClassifier { ranking: vec![] });
        let engine = ClassifierEngine::new(backend, config()).unwrap();

        let err = engine.translate("anything", None).await.unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
    }
}
