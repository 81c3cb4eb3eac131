//! Error types for charm-bug-tool.

use thiserror::Error;

/// Main error type for charm-bug-tool operations.
#[derive(Error, Debug)]
pub enum BugToolError {
    // Operator errors: missing or unresolvable user input
    #[error("{0}")]
    Operator(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Remote tracker errors
    #[error("Tracker operation failed: {0}")]
    Tracker(String),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using BugToolError
pub type Result<T> = std::result::Result<T, BugToolError>;

impl BugToolError {
    /// Create an operator error for missing or unresolvable user input
    pub fn operator(msg: impl Into<String>) -> Self {
        Self::Operator(msg.into())
    }

    /// Create a tracker error with context
    pub fn tracker(msg: impl Into<String>) -> Self {
        Self::Tracker(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Operator errors are reported without a backtrace and exit with a
    /// usage status
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }
}

// Wrap generic I/O errors in the Other variant
impl From<std::io::Error> for BugToolError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for BugToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::NetworkError(err.to_string())
        } else if err.is_status() {
            match err.status().map(|s| s.as_u16()) {
                Some(401) | Some(403) => {
                    Self::AuthenticationError(err.to_string())
                }
                Some(429) => Self::RateLimitExceeded,
                Some(code) if (400..500).contains(&code) => {
                    Self::Tracker(err.to_string())
                }
                _ => Self::NetworkError(err.to_string()),
            }
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

// Implement From for reqwest header errors (needs custom message)
impl From<reqwest::header::InvalidHeaderValue> for BugToolError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::AuthenticationError(format!("Invalid header value: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        let err = BugToolError::operator("milestone 2024.1 not found");
        assert_eq!(err.to_string(), "milestone 2024.1 not found");

        let err = BugToolError::tracker("missing self_link");
        assert_eq!(
            err.to_string(),
            "Tracker operation failed: missing self_link"
        );

        let err = BugToolError::invalid_config("bad service root");
        assert_eq!(err.to_string(), "Invalid configuration: bad service root");
    }

    #[test]
    fn test_error_helpers() {
        let err = BugToolError::operator("missing milestone");
        assert!(err.is_operator());

        let err = BugToolError::tracker("boom");
        assert!(!err.is_operator());
        assert!(matches!(err, BugToolError::Tracker(_)));
    }

    #[test]
    fn test_from_conversions() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: BugToolError = url_err.into();
        assert!(matches!(err, BugToolError::UrlError(_)));

        let io_err = std::io::Error::other("disk full");
        let err: BugToolError = io_err.into();
        assert!(matches!(err, BugToolError::Other(_)));
    }
}
