use thiserror::Error;

/// Result type alias for availability checks
pub type Result<T, E = CheckError> = std::result::Result<T, E>;

/// Errors raised while probing the scheduler API or posting to the relay
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("failed to build request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned status {status} (attempt {attempts})")]
    Status { status: u16, attempts: u32 },

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to decode appointment slots: {0}")]
    Decode(#[from] serde_json::Error),
}
