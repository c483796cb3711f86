//! Prompt template resource for completion-backed engines.
//!
//! The template is an external asset loaded once at engine construction:
//! a JSON object with a `prompt` preamble and optional few-shot
//! `examples`. Loading failures are configuration errors and abort
//! construction; a running engine never re-reads the resource.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One few-shot demonstration in the prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptExample {
    pub utterance: String,
    pub formula: String,
}

/// A prompt preamble plus few-shot examples.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Instruction text placed before the examples.
    #[serde(rename = "prompt")]
    pub preamble: String,
    /// Few-shot utterance/formula pairs.
    #[serde(default)]
    pub examples: Vec<PromptExample>,
}

impl PromptTemplate {
    /// Build a template from raw parts.
    pub fn new(preamble: impl Into<String>, examples: Vec<PromptExample>) -> Result<Self> {
        let template = Self {
            preamble: preamble.into(),
            examples,
        };
        template.validate()?;
        Ok(template)
    }

    /// Load a template from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let template: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("invalid prompt JSON: {}", e)))?;
        template.validate()?;
        Ok(template)
    }

    /// Load a template from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read prompt {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<()> {
        if self.preamble.trim().is_empty() {
            return Err(Error::config("prompt preamble is empty"));
        }
        Ok(())
    }

    /// Render the full completion prompt for an utterance.
    ///
    /// Examples are rendered as `NL:`/`LTLf:` pairs; the utterance goes
    /// last with a trailing `LTLf:` cue so the model completes the
    /// formula line.
    pub fn render(&self, utterance: &str) -> String {
        let mut out = String::with_capacity(self.preamble.len() + 64 * self.examples.len());
        out.push_str(self.preamble.trim_end());
        out.push_str("\n\n");
        for example in &self.examples {
            out.push_str("NL: ");
            out.push_str(&example.utterance);
            out.push_str("\nLTLf: ");
            out.push_str(&example.formula);
            out.push_str("\n\n");
        }
        out.push_str("NL: ");
        out.push_str(utterance);
        out.push_str("\nLTLf:");
        out
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_shape() {
        let template = PromptTemplate::new(
            "Translate natural language into LTLf.",
            vec![PromptExample {
                utterance: "always respond".to_string(),
                formula: "G(respond)".to_string(),
            }],
        )
        .unwrap();

        let rendered = template.render("eventually stop");
        assert_eq!(
            rendered,
            "Translate natural language into LTLf.\n\n\
             NL: always respond\nLTLf: G(respond)\n\n\
             NL: eventually stop\nLTLf:"
        );
    }

    #[test]
    fn test_from_json_without_examples() {
        let template = PromptTemplate::from_json(r#"{"prompt": "Translate."}"#).unwrap();
        assert!(template.examples.is_empty());
        assert!(template.render("x").ends_with("NL: x\nLTLf:"));
    }

    #[test]
    fn test_empty_preamble_is_config_error() {
        let err = PromptTemplate::from_json(r#"{"prompt": "   "}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"prompt": "Translate.", "examples": [{{"utterance": "u", "formula": "f"}}]}}"#
        )
        .unwrap();

        let template = PromptTemplate::from_path(file.path()).unwrap();
        assert_eq!(template.examples.len(), 1);
    }

    #[test]
    fn test_bundled_prompt_loads_and_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/prompt.json");
        let template = PromptTemplate::from_path(path).unwrap();
        assert!(!template.examples.is_empty());
        // Every bundled few-shot formula must be valid LTLf.
        for example in &template.examples {
            crate::syntax::parse_formula(&example.formula).unwrap();
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = PromptTemplate::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
