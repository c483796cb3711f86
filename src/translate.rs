//! The single caller-facing entry point.

use crate::engines::Engine;
use crate::error::{Error, Result};
use crate::filters::Filter;
use crate::result::TranslationResult;

/// Translate a natural-language utterance into LTLf formulas with
/// confidences.
///
/// Pure dispatch: rejects empty utterances before any backend request,
/// then delegates to the supplied engine and returns its result
/// unmodified. Engine selection is the caller's; there is no default.
pub async fn translate(
    utterance: &str,
    engine: &dyn Engine,
    filter: Option<&dyn Filter>,
) -> Result<TranslationResult> {
    if utterance.trim().is_empty() {
        return Err(Error::invalid_input("utterance is empty"));
    }
    engine.translate(utterance, filter).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::result::Candidate;

    /// Engine double that counts calls and returns one fixed formula.
    struct CountingEngine {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Engine for CountingEngine {
        async fn translate(
            &self,
            _utterance: &str,
            filter: Option<&dyn Filter>,
        ) -> Result<TranslationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result =
                TranslationResult::from_candidates(vec![Candidate::new("G(a)", 1.0)])?;
            Ok(crate::engines::apply_filter(result, filter))
        }
    }

    #[tokio::test]
    async fn test_empty_utterance_rejected_before_backend() {
        let engine = CountingEngine {
            calls: AtomicUsize::new(0),
        };

        for utterance in ["", "   ", "\n\t"] {
            let err = translate(utterance, &engine, None).await.unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delegates_to_engine() {
        let engine = CountingEngine {
            calls: AtomicUsize::new(0),
        };

        let result = translate("always a", &engine, None).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }
}
