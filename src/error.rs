/// Failure to obtain a listings snapshot from the upstream API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("API error (HTTP {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    MalformedResponse,
    Api,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::MalformedResponse(_) => FetchErrorKind::MalformedResponse,
            FetchError::Api { .. } => FetchErrorKind::Api,
        }
    }

    /// Whether a caller could reasonably try the same request again.
    ///
    /// Transport failures, rate limiting (429) and upstream 5xx responses are
    /// retryable. Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::MalformedResponse(_) => false,
            FetchError::Api { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// Invalid caller input. These are bugs at the call site, not transient failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid limit {limit}: must be between {min} and {max}")]
    InvalidLimit { limit: usize, min: usize, max: usize },

    #[error("Unknown time window '{0}' (expected one of 1h, 24h, 7d)")]
    UnknownWindow(String),

    #[error("Invalid listings request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CmcError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CmcError>;
