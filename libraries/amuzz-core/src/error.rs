//! Backend gateway error types
use thiserror::Error;

/// Result type alias using `GatewayError`
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Any failure talking to the playlist backend.
///
/// Network failures, 4xx and 5xx responses all land here; callers treat
/// every variant the same way (report and keep the local state).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The backend could not be reached (connect failure or timeout)
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The bearer token was missing, expired or rejected
    #[error("Unauthorized")]
    Unauthorized,

    /// The backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// The response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request was rejected locally before being sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport error that does not fit the other variants
    #[error("Request failed: {0}")]
    Request(String),
}

impl GatewayError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// HTTP status associated with this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_http_failures() {
        assert_eq!(GatewayError::Unauthorized.status(), Some(401));
        assert_eq!(GatewayError::server(503, "down").status(), Some(503));
        assert_eq!(GatewayError::Unreachable("dns".into()).status(), None);
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = GatewayError::server(500, "boom");
        assert_eq!(err.to_string(), "Server error (500): boom");
    }
}
