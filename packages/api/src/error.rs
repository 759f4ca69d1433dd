//! Error taxonomy for every backend call.

use thiserror::Error;

/// Message shown when the backend answers with something that is not JSON.
pub const SERVER_ERROR_MESSAGE: &str = "Server error: the backend returned an unexpected response";
/// Message shown when the backend cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: could not reach the server";
/// Message shown when a JSON response does not match its contract.
pub const SCHEMA_ERROR_MESSAGE: &str = "The server response had an unexpected format";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx response. `detail` is the backend's `{"detail": "..."}` message, if any.
    #[error("request failed with status {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    /// A JSON body was expected but something else arrived (e.g. an HTML error page).
    #[error("expected JSON but received a non-JSON body (status {status})")]
    NotJson { status: u16 },

    /// Valid JSON that does not match the typed contract.
    #[error("response did not match the expected schema: {0}")]
    Schema(String),

    /// The client cannot be built from the configuration it was given.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::NotJson { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Text for a toast notification.
    ///
    /// `fallback` is used for non-2xx responses that carry no `detail`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Status {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            Self::Status { .. } => fallback.to_string(),
            Self::NotJson { .. } => SERVER_ERROR_MESSAGE.to_string(),
            Self::Schema(_) => SCHEMA_ERROR_MESSAGE.to_string(),
            Self::Config(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ApiError::Status {
            status: 401,
            detail: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message("Login failed"), "Login failed");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_non_json_is_distinct_server_error() {
        let err = ApiError::NotJson { status: 502 };
        assert_eq!(err.user_message("Login failed"), SERVER_ERROR_MESSAGE);
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_display_includes_detail() {
        let err = ApiError::Status {
            status: 404,
            detail: Some("Organization not found".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "request failed with status 404: Organization not found"
        );
    }
}
