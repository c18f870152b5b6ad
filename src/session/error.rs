//! Session client error types
//!
//! Defines all errors that can occur while talking to the admin backend
//! or touching the persisted session token.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur in the session client
#[derive(Error, Debug)]
pub enum AdminError {
    /// Backend answered with a non-2xx status
    #[error("API error {status}: {}", display_message(.message, .error))]
    Api {
        status: u16,
        message: Option<String>,
        error: Option<String>,
    },

    /// Backend rejected the credentials or the bearer token (HTTP 401)
    #[error("Unauthorized: {}", display_message(.message, .error))]
    Unauthorized {
        message: Option<String>,
        error: Option<String>,
    },

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// Backend could not be reached
    #[error("Backend unavailable")]
    Unavailable,

    /// Any other transport or decoding failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Login succeeded at the HTTP level but no token was issued
    #[error("Authentication response did not contain a token")]
    MissingToken,

    /// Reading or writing the persisted token failed
    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

fn display_message<'a>(message: &'a Option<String>, error: &'a Option<String>) -> &'a str {
    message
        .as_deref()
        .or(error.as_deref())
        .unwrap_or("no details")
}

impl AdminError {
    /// Build an error from a non-2xx status and the raw response body.
    ///
    /// The body is parsed as `{ "message": ..., "error": ... }`. Both fields
    /// are kept; empty strings count as absent.
    pub fn from_response(status: u16, body: &str) -> Self {
        let ErrorBody { message, error } = serde_json::from_str::<ErrorBody>(body)
            .map(ErrorBody::non_empty)
            .unwrap_or_default();

        if status == 401 {
            AdminError::Unauthorized { message, error }
        } else {
            AdminError::Api {
                status,
                message,
                error,
            }
        }
    }

    /// HTTP status reported by the backend, if the error came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Api { status, .. } => Some(*status),
            AdminError::Unauthorized { .. } => Some(401),
            AdminError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// `message` field of the backend's error body
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            AdminError::Api { message, .. } | AdminError::Unauthorized { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// `error` field of the backend's error body
    pub fn backend_error(&self) -> Option<&str> {
        match self {
            AdminError::Api { error, .. } | AdminError::Unauthorized { error, .. } => {
                error.as_deref()
            }
            _ => None,
        }
    }

    /// Whether this error means the bearer token was rejected
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AdminError::Unauthorized { .. })
    }

    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AdminError::Timeout
        } else if e.is_connect() {
            AdminError::Unavailable
        } else {
            AdminError::Request(e)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn non_empty(self) -> Self {
        Self {
            message: self.message.filter(|m| !m.is_empty()),
            error: self.error.filter(|e| !e.is_empty()),
        }
    }
}

/// Result type alias for session client operations
pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_from_response() {
        let err = AdminError::from_response(401, r#"{"message": "Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.backend_message(), Some("Invalid credentials"));
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Unauthorized: Invalid credentials");
    }

    #[test]
    fn test_api_error_falls_back_to_error_field() {
        let err = AdminError::from_response(500, r#"{"error": "Database down"}"#);
        assert!(matches!(err, AdminError::Api { status: 500, .. }));
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.backend_error(), Some("Database down"));
        assert_eq!(err.to_string(), "API error 500: Database down");
    }

    #[test]
    fn test_both_body_fields_are_kept() {
        let err = AdminError::from_response(
            500,
            r#"{"message": "Internal server error", "error": "Database down"}"#,
        );
        assert_eq!(err.backend_message(), Some("Internal server error"));
        assert_eq!(err.backend_error(), Some("Database down"));

        let err = AdminError::from_response(401, r#"{"message": "", "error": "Token expired"}"#);
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.backend_error(), Some("Token expired"));
    }

    #[test]
    fn test_api_error_without_json_body() {
        let err = AdminError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.to_string(), "API error 502: no details");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AdminError = io_err.into();
        assert!(matches!(err, AdminError::Storage(_)));
        assert_eq!(err.status(), None);
    }
}
