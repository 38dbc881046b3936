use stratus_core::{CoreError, ProviderError};
use thiserror::Error;

/// Fatal, run-level errors. Each aborts the run before (or instead of) any
/// per-resource work and is printed as a single `[Error]` line.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Selector misuse, malformed identifier or pattern, missing region,
    /// invalid policy. Always raised before any network call.
    #[error("{0}")]
    Configuration(String),

    /// The provider could not be reached while resolving targets.
    #[error("{0}")]
    Resolution(String),

    /// Resolution finished without a single target.
    #[error("{0}")]
    NoTargets(String),

    /// A listing call kept failing with retryable errors.
    #[error("Max retry count exceeded. {last}")]
    RetryExhausted { last: ProviderError },

    /// A listing call failed with a permanent error.
    #[error("{0}")]
    Provider(ProviderError),

    #[error("prompt failed: {0}")]
    Interaction(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for ReconcileError {
    fn from(err: CoreError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Why one resource's snapshot could not be taken.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("resource does not exist: {0}")]
    NotFound(String),

    #[error("{source}")]
    Provider {
        operation: &'static str,
        source: ProviderError,
    },
}

impl FetchError {
    pub fn new(operation: &'static str, source: ProviderError) -> Self {
        match source {
            ProviderError::NotFound(msg) => Self::NotFound(msg),
            source => Self::Provider { operation, source },
        }
    }

    /// The read call the failure is reported against.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Describe",
            Self::Provider { operation, .. } => operation,
        }
    }
}

/// A resource whose current state cannot be reconciled with the policy.
#[derive(Debug, Clone, Error)]
pub enum DiffError {
    #[error("runtime {runtime} has no {layer} layer")]
    UnsupportedRuntime { runtime: String, layer: &'static str },

    #[error("function has no runtime (container image functions cannot take layers)")]
    MissingRuntime,
}
