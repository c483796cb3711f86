//! Error types for nl2ltl.

use thiserror::Error;

/// Result type alias using nl2ltl's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during translation.
///
/// Construction-time variants (`Config`, `UnsupportedModel`,
/// `IncompatibleDependency`) abort engine creation entirely; a
/// successfully constructed engine never re-raises them. The remaining
/// variants are per-call and are returned from `translate` rather than
/// being collapsed into an empty result, since "no translation" and
/// "failed call" mean different things to callers.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or missing prompt resource, malformed engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested model identifier is not in the engine's allow-list
    #[error("Unsupported model: {model}")]
    UnsupportedModel { model: String },

    /// Backend client version does not match what the engine expects
    #[error("Incompatible backend version: required {required}, found {found}")]
    IncompatibleDependency { required: String, found: String },

    /// Empty or otherwise invalid utterance
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backend returned no usable choices
    #[error("Backend returned no usable choices")]
    EmptyResponse,

    /// Every candidate failed to parse as a formula
    #[error("No valid formula among {candidates} candidate(s)")]
    NoValidFormula { candidates: usize },

    /// Backend request timed out
    #[error("Backend timeout: {0}")]
    BackendTimeout(String),

    /// Backend could not be reached
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend API error
    #[error("Backend error: {backend} - {message}")]
    Backend { backend: String, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an unsupported-model error.
    pub fn unsupported_model(model: impl Into<String>) -> Self {
        Self::UnsupportedModel {
            model: model.into(),
        }
    }

    /// Create an incompatible-dependency error.
    pub fn incompatible_dependency(
        required: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::IncompatibleDependency {
            required: required.into(),
            found: found.into(),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a backend API error.
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }
}
