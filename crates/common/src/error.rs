use std::time::Duration;

/// TextBrief error types
#[derive(Debug, thiserror::Error)]
pub enum TextBriefError {
    /// Summarization mode is not one of the recognized values
    #[error("Invalid mode specified: {0}")]
    InvalidMode(String),

    /// Provider identifier has no registered adapter
    #[error("Invalid provider specified: {0}")]
    UnsupportedProvider(String),

    /// Upstream vendor answered with a non-success status
    #[error("Failed to get response from {provider} (status {status}): {message}")]
    Upstream {
        provider: String,
        status: u16,
        message: String,
    },

    /// Upstream vendor answered 2xx but without the expected result field
    #[error("Invalid response format from AI provider: {0}")]
    MalformedUpstreamResponse(String),

    /// File suffix (and declared type) match no extractor
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Underlying document parser failed
    #[error("Failed to extract text: {0}")]
    ExtractionFailed(String),

    /// Extraction produced no usable text
    #[error("No text could be extracted from the document: {0}")]
    EmptyExtraction(String),

    /// API key absent or blank
    #[error("API key is required")]
    MissingCredentials,

    /// Input text absent or blank
    #[error("No text provided")]
    MissingText,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream call exceeded its deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Caller cancelled the in-flight operation
    #[error("Request cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TextBriefError {
    /// Create upstream error
    pub fn upstream<P: Into<String>, M: Into<String>>(provider: P, status: u16, message: M) -> Self {
        Self::Upstream {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create malformed upstream response error
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedUpstreamResponse(msg.into())
    }

    /// Create extraction failure
    pub fn extraction<S: Into<String>>(msg: S) -> Self {
        Self::ExtractionFailed(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// True for errors caused by the caller's input rather than a dependency
    pub fn is_client_error(&self) -> bool {
        self.status_code() == 400
    }
}

// HTTP response conversion (used by the actix boundary)
impl TextBriefError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidMode(_) => 400,
            Self::UnsupportedProvider(_) => 400,
            Self::MissingCredentials => 400,
            Self::MissingText => 400,
            Self::InvalidInput(_) => 400,
            Self::Json(_) => 400,
            Self::Upstream { status, .. } => *status,
            Self::MalformedUpstreamResponse(_) => 500,
            Self::UnsupportedFileType(_) => 500,
            Self::ExtractionFailed(_) => 500,
            Self::EmptyExtraction(_) => 500,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Network(_) => 503,
            Self::Timeout(_) => 504,
            Self::Cancelled => 499,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_is_propagated() {
        let err = TextBriefError::upstream("openai", 401, "invalid api key");
        assert_eq!(err.status_code(), 401);
        assert_eq!(
            err.to_string(),
            "Failed to get response from openai (status 401): invalid api key"
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(TextBriefError::MissingText.is_client_error());
        assert!(TextBriefError::MissingCredentials.is_client_error());
        assert!(TextBriefError::InvalidMode("poem".into()).is_client_error());
        assert!(!TextBriefError::malformed("no choices").is_client_error());
        assert!(!TextBriefError::Timeout(Duration::from_secs(1)).is_client_error());
    }
}
