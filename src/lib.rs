//! # nl2ltl
//!
//! Translate natural-language utterances into LTLf formulas, each
//! annotated with a confidence score in [0, 1], so planning and
//! monitoring tools can consume structured specifications instead of
//! free text.
//!
//! ## Core Components
//!
//! - **Syntax**: LTLf formula tree with a canonical, round-tripping
//!   textual form
//! - **Engines**: pluggable backend adapters (completion-backed,
//!   classifier-backed) exposing one `translate` operation
//! - **Filters**: pure post-processing transforms narrowing or ranking
//!   a result
//! - **Translate**: the single entry point tying them together
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nl2ltl::{
//!     translate, BackendConfig, BasicFilter, GptConfig, GptEngine,
//!     OpenAiBackend, PromptTemplate,
//! };
//!
//! let backend = Arc::new(OpenAiBackend::new(BackendConfig::new(api_key)));
//! let prompt = PromptTemplate::from_path("data/prompt.json")?;
//! let engine = GptEngine::new(backend, GptConfig::new("gpt-4"), prompt)?;
//!
//! let result = translate(
//!     "Eventually send me a Slack after receiving a Gmail",
//!     &engine,
//!     Some(&BasicFilter),
//! )
//! .await?;
//!
//! for (formula, confidence) in result.ranked() {
//!     println!("{formula}  [{confidence:.2}]");
//! }
//! ```

pub mod backend;
pub mod engines;
pub mod error;
pub mod filters;
pub mod prompt;
pub mod result;
pub mod syntax;
pub mod translate;

// Re-exports for convenience
pub use backend::{
    BackendConfig, CompletionBackend, CompletionChoice, CompletionRequest, CompletionResponse,
    IntentClassifier, IntentPrediction, OpenAiBackend, RasaBackend,
};
pub use engines::{ClassifierConfig, ClassifierEngine, Engine, GptConfig, GptEngine};
pub use error::{Error, Result};
pub use filters::{BasicFilter, ChainFilter, Filter, ThresholdFilter, TopKFilter};
pub use prompt::{PromptExample, PromptTemplate};
pub use result::TranslationResult;
pub use syntax::{parse_formula, Formula, ParseError};
pub use translate::translate;
