//! Translation engines.
//!
//! An [`Engine`] wraps one backend and owns its backend-specific
//! configuration; all consistency checks run once at construction, so a
//! successfully built engine is valid for its whole lifetime and safe
//! to share across tasks (nothing is written after construction). Two
//! variants ship with the crate, the completion-backed [`GptEngine`]
//! and the intent-classifier-backed [`ClassifierEngine`], and callers
//! can register their own by implementing the trait.

mod classifier;
mod gpt;
mod output;

use async_trait::async_trait;

use crate::error::Result;
use crate::filters::Filter;
use crate::result::TranslationResult;

pub use classifier::{ClassifierConfig, ClassifierEngine};
pub use gpt::{GptConfig, GptEngine};
pub use output::parse_choices;

/// A pluggable utterance → formulas translator.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Translate an utterance into formulas with confidences.
    ///
    /// Performs exactly one outbound backend request. When a filter is
    /// supplied the returned result is exactly `filter(raw_result)`;
    /// otherwise the raw result is returned unchanged. Failures are
    /// surfaced as errors, never as an empty result.
    async fn translate(
        &self,
        utterance: &str,
        filter: Option<&dyn Filter>,
    ) -> Result<TranslationResult>;
}

/// Apply an optional filter to a freshly built result.
pub(crate) fn apply_filter(
    result: TranslationResult,
    filter: Option<&dyn Filter>,
) -> TranslationResult {
    match filter {
        Some(filter) => filter.apply(&result),
        None => result,
    }
}
