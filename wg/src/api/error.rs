//! Gateway error types

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Category a failure is reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Deadline elapsed before a response arrived
    Timeout,
    /// Response arrived with a server-fault status
    Server,
    /// No response could be obtained at all
    Network,
    /// Local precondition failed before any network call
    Validation,
    /// Response arrived carrying an error payload
    Application,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Server => "server",
            ErrorCategory::Network => "network",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Application => "application",
        };
        write!(f, "{}", s)
    }
}

/// Errors that can occur while talking to the planning backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Unable to reach {base_url}: {message}")]
    Network { base_url: String, message: String },

    #[error("Request failed ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Application { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Category this error is reported under
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Timeout(_) => ErrorCategory::Timeout,
            ApiError::Server { .. } => ErrorCategory::Server,
            ApiError::Network { .. } => ErrorCategory::Network,
            ApiError::Application { .. } | ApiError::InvalidResponse(_) | ApiError::Json(_) => {
                ErrorCategory::Application
            }
        }
    }

    /// Build the error for a non-success HTTP status
    ///
    /// `body` is the raw response text; a JSON `{"error": "..."}` payload is
    /// unpacked when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_payload(body);
        if status >= 500 {
            ApiError::Server {
                status,
                message: message.unwrap_or_else(|| body.trim().to_string()),
            }
        } else {
            ApiError::Application { status, message }
        }
    }

    /// Message from the backend's error payload, if one was sent
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Application { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

fn error_payload(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
