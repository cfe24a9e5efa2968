use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("Empty version string")]
    Empty,

    #[error("Non-numeric version: '{0}'")]
    NotNumeric(String),

    #[error("Unexpected suffix in version '{version}': '{suffix}'")]
    InvalidSuffix { version: String, suffix: String },

    #[error("Version component out of range: '{0}'")]
    Overflow(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pull request already recorded: {0}")]
    AlreadyRecorded(String),
}
