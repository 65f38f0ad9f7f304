//! Jobs API client error types.

use std::sync::Arc;

use jobcache_core::TransportError;

/// Errors from the jobs API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Base URL or endpoint could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Authentication failed (missing or expired token).
    #[error("authentication failed: HTTP {status}")]
    AuthError { status: u16 },

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ApiError::Timeout } else { ApiError::Network(Arc::new(err)) }
    }
}

impl From<ApiError> for TransportError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Timeout => TransportError::Timeout,
            ApiError::AuthError { .. } => TransportError::Unauthorized(err.to_string()),
            ApiError::HttpError { status } => TransportError::Http { status },
            ApiError::Parse(msg) => TransportError::Decode(msg),
            ApiError::InvalidUrl(_) | ApiError::Network(_) => TransportError::Network(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::AuthError { status: 401 };
        assert!(err.to_string().contains("authentication"));

        let err = ApiError::HttpError { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_into_transport_error() {
        assert_eq!(TransportError::from(ApiError::Timeout), TransportError::Timeout);
        assert_eq!(
            TransportError::from(ApiError::HttpError { status: 500 }),
            TransportError::Http { status: 500 }
        );
        assert!(matches!(
            TransportError::from(ApiError::AuthError { status: 403 }),
            TransportError::Unauthorized(_)
        ));
        assert!(matches!(TransportError::from(ApiError::Parse("eof".into())), TransportError::Decode(_)));
    }
}
