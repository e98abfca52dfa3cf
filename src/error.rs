use thiserror::Error;

/// Errors from talking to the data API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success status; `message` is the server's own text when it sent one
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Invalid API URL: {0}")]
    Url(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Url(_) | ApiError::Decode(_) | ApiError::Json(_) | ApiError::Io(_) => None,
        }
    }
}

/// Convenience Result type using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
