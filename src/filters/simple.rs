//! The stock filters: best-only, threshold, top-K, and composition.

use super::Filter;
use crate::result::TranslationResult;

/// Keeps only the single highest-confidence formula.
///
/// Ties are broken by the formula's canonical text, so the survivor is
/// the same across runs. Idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicFilter;

impl Filter for BasicFilter {
    fn apply(&self, result: &TranslationResult) -> TranslationResult {
        result.best().into_iter().collect()
    }
}

/// Drops every entry with confidence below the cutoff.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdFilter {
    cutoff: f64,
}

impl ThresholdFilter {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }
}

impl Filter for ThresholdFilter {
    fn apply(&self, result: &TranslationResult) -> TranslationResult {
        result
            .iter()
            .filter(|(_, confidence)| *confidence >= self.cutoff)
            .map(|(formula, confidence)| (formula.clone(), confidence))
            .collect()
    }
}

/// Keeps the K highest-confidence entries, same deterministic tie-break
/// as [`BasicFilter`].
#[derive(Debug, Clone, Copy)]
pub struct TopKFilter {
    k: usize,
}

impl TopKFilter {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl Filter for TopKFilter {
    fn apply(&self, result: &TranslationResult) -> TranslationResult {
        result.ranked().into_iter().take(self.k).collect()
    }
}

/// Applies filters in sequence.
#[derive(Default)]
pub struct ChainFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl ChainFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Filter for ChainFilter {
    fn apply(&self, result: &TranslationResult) -> TranslationResult {
        let mut current = result.clone();
        for filter in &self.filters {
            current = filter.apply(&current);
        }
        current
    }
}
