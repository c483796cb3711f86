//! Translation results: candidate records, scoring, and normalization.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::syntax::{parse_formula, Formula};

/// An unvalidated textual guess from a backend, with its raw score.
///
/// Candidates exist only between the output parser and the result
/// builder; they never cross the caller-facing API.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Raw formula text as emitted by the backend.
    pub text: String,
    /// Backend-assigned likelihood, not yet normalized.
    pub score: f64,
}

impl Candidate {
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

/// A mapping from formula to confidence in [0, 1].
///
/// This is the sole data structure crossing the engine boundary. Keys
/// are unique; duplicate parses are merged at build time. Iteration
/// order of the underlying map is meaningless; use [`ranked`] for a
/// deterministic ordering.
///
/// [`ranked`]: TranslationResult::ranked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationResult {
    scores: HashMap<Formula, f64>,
}

impl TranslationResult {
    /// Build a result from raw candidates.
    ///
    /// Each candidate's text is parsed against the formula grammar;
    /// candidates that fail to parse are dropped (malformed model output
    /// is expected and non-fatal). Candidates that parse to the same
    /// formula are merged by taking the maximum raw score, so
    /// near-duplicate phrasings of one completion are not double
    /// counted. Merged scores are then rescaled by their sum so the
    /// final confidences sum to 1.0; a zero sum falls back to uniform
    /// confidence over the surviving formulas.
    ///
    /// Fails with [`Error::NoValidFormula`] when every candidate fails
    /// to parse, since callers must be able to tell backend noise apart from
    /// backend silence, so an empty-but-successful result is never
    /// produced.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Result<Self> {
        let total = candidates.len();
        let mut merged: HashMap<Formula, f64> = HashMap::new();
        for candidate in candidates {
            match parse_formula(candidate.text.trim()) {
                Ok(formula) => {
                    let entry = merged.entry(formula).or_insert(f64::NEG_INFINITY);
                    *entry = entry.max(candidate.score);
                }
                Err(err) => {
                    debug!(text = %candidate.text, %err, "dropping unparseable candidate");
                }
            }
        }
        if merged.is_empty() {
            return Err(Error::NoValidFormula { candidates: total });
        }

        // Stable summation/division order: canonical text, so rounding
        // does not drift across runs.
        let mut entries: Vec<(Formula, f64)> = merged.into_iter().collect();
        entries.sort_by(|a, b| a.0.canonical().cmp(&b.0.canonical()));

        let sum: f64 = entries.iter().map(|(_, s)| s).sum();
        let count = entries.len() as f64;
        let scores = entries
            .into_iter()
            .map(|(formula, score)| {
                let confidence = if sum > 0.0 { score / sum } else { 1.0 / count };
                (formula, confidence)
            })
            .collect();

        Ok(Self { scores })
    }

    /// Confidence for a formula, if present.
    pub fn confidence(&self, formula: &Formula) -> Option<f64> {
        self.scores.get(formula).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Formula, f64)> {
        self.scores.iter().map(|(f, c)| (f, *c))
    }

    /// Entries sorted by confidence descending, ties broken by the
    /// formula's canonical text ascending.
    pub fn ranked(&self) -> Vec<(Formula, f64)> {
        let mut entries: Vec<(Formula, f64)> =
            self.scores.iter().map(|(f, c)| (f.clone(), *c)).collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.canonical().cmp(&b.0.canonical()))
        });
        entries
    }

    /// The highest-confidence entry, with the same tie-break as
    /// [`ranked`](Self::ranked).
    pub fn best(&self) -> Option<(Formula, f64)> {
        self.ranked().into_iter().next()
    }
}

impl FromIterator<(Formula, f64)> for TranslationResult {
    fn from_iter<I: IntoIterator<Item = (Formula, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TranslationResult {
    type Item = (Formula, f64);
    type IntoIter = std::collections::hash_map::IntoIter<Formula, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.scores.into_iter()
    }
}


#[cfg(test)]
mod prop_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// Normalized confidences are probabilities summing to one.
        #[test]
        fn confidences_sum_to_one(
            scores in proptest::collection::vec(0.0f64..10.0, 1..8)
        ) {
            let candidates = scores
                .iter()
                .enumerate()
                .map(|(i, s)| Candidate::new(format!("atom_{}", i), *s))
                .collect();
            let result = TranslationResult::from_candidates(candidates).unwrap();
            let sum: f64 = result.iter().map(|(_, c)| c).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "sum = {}", sum);
            for (_, confidence) in result.iter() {
                prop_assert!((0.0..=1.0 + 1e-9).contains(&confidence));
            }
        }

        /// Merging is insensitive to candidate order.
        #[test]
        fn merge_is_order_insensitive(
            scores in proptest::collection::vec(0.0f64..1.0, 2..6)
        ) {
            let forward: Vec<Candidate> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| Candidate::new(format!("atom_{}", i), *s))
                .collect();
            let mut backward = forward.clone();
            backward.reverse();

            let a = TranslationResult::from_candidates(forward).unwrap();
            let b = TranslationResult::from_candidates(backward).unwrap();
            for (formula, confidence) in a.iter() {
                let other = b.confidence(formula).unwrap();
                prop_assert!((confidence - other).abs() < 1e-12);
            }
        }
    }
}
