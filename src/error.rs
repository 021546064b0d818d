use thiserror::Error;

/// Errors that can occur while talking to the recipe backend
#[derive(Error, Debug)]
pub enum ChopsmoError {
    /// Transport-level failure while fetching from the backend
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-success status
    #[error("Backend returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Base URL or request path could not be turned into a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response body was not the JSON we expected
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Reading local input failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ChopsmoError {
    /// Classify a reqwest error, separating timeouts from other transport failures
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChopsmoError::Timeout(err.to_string())
        } else {
            ChopsmoError::FetchError(err)
        }
    }
}
