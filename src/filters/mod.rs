//! Pluggable post-processing filters over translation results.

mod simple;

use crate::result::TranslationResult;

pub use simple::{BasicFilter, ChainFilter, ThresholdFilter, TopKFilter};

/// A pure transform narrowing or reordering a translation result.
///
/// Implementations never mutate their input; engines apply at most one
/// filter per call, and [`ChainFilter`] is the caller-side way to
/// compose several.
pub trait Filter: Send + Sync {
    fn apply(&self, result: &TranslationResult) -> TranslationResult;
}
