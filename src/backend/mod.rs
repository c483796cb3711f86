//! Backend clients for translation engines.
//!
//! Engines never see raw SDK payloads: every backend adapts its wire
//! shape into the small normalized contract defined here
//! ([`CompletionResponse`] for completion services,
//! [`IntentPrediction`] rankings for classifiers), so caller-facing
//! types stay independent of any particular service.

mod classifier;
mod completion;

pub use classifier::{IntentClassifier, IntentPrediction, RasaBackend};
pub use completion::{
    BackendConfig, CompletionBackend, CompletionChoice, CompletionRequest, CompletionResponse,
    OpenAiBackend,
};
