use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid arn format for {flag}: {value}")]
    InvalidArn { flag: &'static str, value: String },

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of a single provider call, classified at the SDK boundary.
///
/// The message is the provider's own text wherever one was available, so
/// reports can show it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Throttled(String),

    #[error("{0}")]
    Transient(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Service(String),
}

impl ProviderError {
    /// Throttling and transport-level failures are worth another attempt;
    /// everything else is permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttled(_) | Self::Transient(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
