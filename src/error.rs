use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepScanError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("No dependencies found: package.json must contain at least one entry in \"dependencies\" or \"devDependencies\"")]
    NoDependencies,

    #[error("Invalid command line arguments: {0}")]
    InvalidArguments(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{provider} responded with HTTP {status}")]
    UpstreamStatus { provider: &'static str, status: u16 },

    #[error("{provider} lookup timed out after {timeout} seconds")]
    UpstreamTimeout { provider: &'static str, timeout: u64 },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DepScanError {
    /// Errors caused by the submitted manifest rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DepScanError::InvalidInput(_) | DepScanError::NoDependencies)
    }

    /// Message safe to hand back to a caller. Internal detail is never exposed.
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            "Internal server error".to_string()
        }
    }
}
