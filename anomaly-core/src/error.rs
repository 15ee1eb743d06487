use reqwest::StatusCode;
use thiserror::Error;

/// Terminal failure of a single outbound weather API call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to weather API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather API responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("weather API reported an error: {0}")]
    Custom(String),

    #[error("failed to decode weather API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid weather API url: {0}")]
    Url(String),
}

/// Errors reported back to the caller of the adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{0}")]
    Validation(String),

    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[from] FetchError),

    #[error("expected {expected} hourly readings, got {actual}")]
    DataShape { expected: usize, actual: usize },
}

impl AdapterError {
    /// HTTP-style status reported for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::UpstreamFetch(_) | Self::DataShape { .. } => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::UpstreamFetch(_) => "UpstreamFetchError",
            Self::DataShape { .. } => "DataShapeError",
        }
    }
}
