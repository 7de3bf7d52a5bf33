//! Transport error types

/// Errors that can occur while a transport call is in flight.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP error response from the service.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message or raw response body.
        message: String,
    },

    /// Network error during the call.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The call was aborted before completing.
    ///
    /// Aborted calls still settle the request cycle, but no user-facing
    /// failure notice is produced for them.
    #[error("request aborted")]
    Aborted,

    /// The call did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be parsed.
    #[error("response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl TransportError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Maps a `reqwest` failure onto the transport taxonomy.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the call was aborted rather than failed.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Returns `true` if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) | Self::Timeout => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        assert_eq!(TransportError::http(503, "unavailable").status_code(), Some(503));
        assert_eq!(TransportError::Aborted.status_code(), None);
    }

    #[test]
    fn test_abort_is_not_retryable() {
        assert!(TransportError::Aborted.is_abort());
        assert!(!TransportError::Aborted.is_retryable());
        assert!(TransportError::http(502, "bad gateway").is_retryable());
        assert!(!TransportError::http(404, "missing").is_retryable());
    }
}
