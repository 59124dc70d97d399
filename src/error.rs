#[derive(Debug, thiserror::Error)]
pub enum DeckmillError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DeckmillError {
    /// Whether this error came from talking to the card-data provider
    /// (network failure, timeout, bad status or an unparseable body).
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(
            self,
            DeckmillError::Http(_) | DeckmillError::HttpStatus(_) | DeckmillError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DeckmillError>;
