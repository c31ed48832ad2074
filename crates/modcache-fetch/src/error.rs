use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid fetch operation")]
    InvalidOperation,

    #[error("driver exited with an error: {0}")]
    DriverFailed(String),

    #[error("driver produced malformed output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("result is missing the {0} field for this operation")]
    MissingArtifact(&'static str),

    #[error("fetch was cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;
