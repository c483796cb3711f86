//! Output parser: normalized backend responses → candidate records.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::backend::CompletionResponse;
use crate::error::{Error, Result};
use crate::result::Candidate;

/// Leading labels some models prepend to the formula line, e.g.
/// `LTLf: G(a)` or `F1: a U b`.
static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:LTLf?|Formula|F\d+)\s*:\s*").expect("Invalid regex")
});

/// Extract candidates from a completion response.
///
/// For each choice the primary payload is its first non-empty line,
/// with any backend-added label stripped. The raw score
/// is the directly provided probability when present, otherwise the
/// exponentiated cumulative log-probability. Choices with empty text or
/// a non-finite score are dropped. Backend ordering is preserved in the
/// returned vector but only ever used as a tiebreak; ranking is score
/// driven and happens in the result builder.
///
/// Fails with [`Error::EmptyResponse`] when no usable choice remains,
/// so "backend returned nothing parseable" never masquerades as a
/// successful empty translation.
pub fn parse_choices(response: &CompletionResponse) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::with_capacity(response.choices.len());
    for choice in &response.choices {
        let line = choice
            .text
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("");
        let text = LABEL_PATTERN.replace(line.trim(), "").trim().to_string();
        if text.is_empty() {
            debug!("dropping choice with empty text");
            continue;
        }

        let score = match (choice.probability, choice.logprob) {
            (Some(p), _) => p,
            (None, Some(lp)) => lp.exp(),
            (None, None) => {
                debug!(%text, "dropping choice with no likelihood signal");
                continue;
            }
        };
        if !score.is_finite() {
            debug!(%text, score, "dropping choice with non-finite score");
            continue;
        }

        candidates.push(Candidate::new(text, score));
    }

    if candidates.is_empty() {
        return Err(Error::EmptyResponse);
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::backend::CompletionChoice;

    fn response(choices: Vec<CompletionChoice>) -> CompletionResponse {
        CompletionResponse {
            model: "test-model".to_string(),
            choices,
            timestamp: Utc::now(),
        }
    }

    fn choice(text: &str, logprob: f64) -> CompletionChoice {
        CompletionChoice {
            text: text.to_string(),
            logprob: Some(logprob),
            probability: None,
        }
    }

    #[test]
    fn test_first_line_and_label_stripping() {
        let candidates = parse_choices(&response(vec![
            choice(" LTLf: G(a -> F(b))\nsome trailing explanation", -0.5),
            choice("F1: a U b", -1.0),
            choice("G(c)", -2.0),
        ]))
        .unwrap();

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].text, "G(a -> F(b))");
        assert_eq!(candidates[1].text, "a U b");
        assert_eq!(candidates[2].text, "G(c)");
    }

    #[test]
    fn test_leading_blank_lines_are_skipped() {
        // Completions routinely start with backend-added newlines; the
        // payload is the first non-empty line, not the literal first.
        let candidates = parse_choices(&response(vec![
            choice("\nG(a)", -0.5),
            choice("\n\n  \nLTLf: F(b)\nignored", -1.0),
        ]))
        .unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].text, "G(a)");
        assert_eq!(candidates[1].text, "F(b)");
    }

    #[test]
    fn test_logprob_exponentiation() {
        let candidates = parse_choices(&response(vec![choice("G(a)", -0.5)])).unwrap();
        assert!((candidates[0].score - (-0.5_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_direct_probability_wins_over_logprob() {
        let candidates = parse_choices(&response(vec![CompletionChoice {
            text: "G(a)".to_string(),
            logprob: Some(-0.5),
            probability: Some(0.8),
        }]))
        .unwrap();
        assert!((candidates[0].score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_unusable_choices_dropped() {
        let candidates = parse_choices(&response(vec![
            choice("", -0.5),
            choice("   \n", -0.5),
            choice("G(a)", f64::NAN),
            CompletionChoice {
                text: "F(b)".to_string(),
                logprob: None,
                probability: None,
            },
            choice("G(ok)", -0.1),
        ]))
        .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "G(ok)");
    }

    #[test]
    fn test_zero_usable_choices_is_empty_response() {
        let err = parse_choices(&response(vec![choice("", -0.5)])).unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));

        let err = parse_choices(&response(vec![])).unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
    }
}
