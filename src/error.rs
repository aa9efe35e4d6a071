//! Error taxonomy for API calls and the user-facing notice each kind maps to.
//!
//! DESIGN
//! ======
//! Every failed call resolves to one `ApiError`. Session-invalidating kinds
//! (`AuthExpired`, `RefreshFailed`) are acted on globally by the HTTP client
//! before they reach the caller; every other kind is only announced and
//! returned. Server payloads are inspected once, here, instead of at each
//! call site.

use serde_json::Value;

use crate::session::StoreError;
use crate::ui::SESSION_EXPIRED_MESSAGE;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action.";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthExpired,
    RefreshFailed,
    PermissionDenied,
    NotFound,
    ServerError,
    ValidationError,
    NetworkError,
    Decode,
    Store,
    InvalidRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No usable credentials remain; the session has been cleared.
    #[error("session expired")]
    AuthExpired,

    /// The refresh call itself failed; the session has been cleared.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("permission denied")]
    PermissionDenied { message: Option<String> },

    #[error("resource not found")]
    NotFound { message: Option<String> },

    #[error("server error (HTTP {status})")]
    Server { status: u16, message: Option<String> },

    /// Any other non-success status, including a 401 on an already-retried request.
    #[error("request rejected (HTTP {status})")]
    Rejected { status: u16, message: Option<String>, body: Value },

    #[error("network error: {0}")]
    Network(String),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("session store failed: {0}")]
    Store(#[from] StoreError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Classify a non-success HTTP status and its (possibly empty) body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let body: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let message = server_message(&body);
        match status {
            403 => Self::PermissionDenied { message },
            404 => Self::NotFound { message },
            500..=599 => Self::Server { status, message },
            _ => Self::Rejected { status, message, body },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthExpired => ErrorKind::AuthExpired,
            Self::RefreshFailed(_) => ErrorKind::RefreshFailed,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::Rejected { .. } => ErrorKind::ValidationError,
            Self::Network(_) => ErrorKind::NetworkError,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Store(_) => ErrorKind::Store,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// HTTP status behind the error, when there was a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::PermissionDenied { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the session was torn down because of this error.
    #[must_use]
    pub fn ends_session(&self) -> bool {
        matches!(self.kind(), ErrorKind::AuthExpired | ErrorKind::RefreshFailed)
    }

    /// The text shown to the user for this error.
    #[must_use]
    pub fn notice_message(&self) -> String {
        match self {
            Self::AuthExpired | Self::RefreshFailed(_) => SESSION_EXPIRED_MESSAGE.to_owned(),
            Self::PermissionDenied { .. } => PERMISSION_DENIED_MESSAGE.to_owned(),
            Self::NotFound { .. } => NOT_FOUND_MESSAGE.to_owned(),
            Self::Server { .. } => SERVER_ERROR_MESSAGE.to_owned(),
            Self::Rejected { status, message, .. } => message
                .clone()
                .unwrap_or_else(|| format!("Request failed with status code {status}")),
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_owned(),
            Self::Decode(_) | Self::Store(_) | Self::InvalidRequest(_) => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            return Self::InvalidRequest(e.to_string());
        }
        if e.is_decode() {
            return Self::Decode(e.to_string());
        }
        if e.is_timeout() {
            return Self::Network(format!("request timed out: {e}"));
        }
        Self::Network(e.to_string())
    }
}

/// Pull a human-readable message out of an API error payload.
///
/// Checks `message`, `detail` and `error`, then the first entry of the first
/// field-error list in the order the server sent them
/// (`{"title": ["Title must be ..."]}`). Other scalar fields such as `code`
/// are never shown.
#[must_use]
pub fn server_message(body: &Value) -> Option<String> {
    let map = body.as_object()?;
    for key in ["message", "detail", "error"] {
        if let Some(text) = map.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty()) {
            return Some(text.to_owned());
        }
    }
    map.values().find_map(|value| {
        value
            .as_array()?
            .iter()
            .filter_map(Value::as_str)
            .find(|text| !text.trim().is_empty())
            .map(ToOwned::to_owned)
    })
}
