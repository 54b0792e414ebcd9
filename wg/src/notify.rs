//! User-facing notices
//!
//! The wizard and chat session never print anything themselves. They hand a
//! [`Notice`] to whatever [`Notifier`] the front-end supplies.

use std::fmt;
use std::sync::Mutex;

use tracing::debug;

use crate::api::{ApiError, ErrorCategory};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A single user-visible signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    /// Set for failures
    pub category: Option<ErrorCategory>,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
            category: None,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
            category: None,
        }
    }

    /// Local precondition failure
    pub fn validation(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
            category: Some(ErrorCategory::Validation),
        }
    }

    /// Notice for a failed backend call
    ///
    /// `failure_title` heads application errors, where the backend's own
    /// message is shown verbatim when it sent one.
    pub fn from_api_error(err: &ApiError, failure_title: &str) -> Self {
        debug!(category = %err.category(), "Notice::from_api_error: called");
        let (title, message) = match err {
            ApiError::Timeout(_) => (
                "Request Timeout".to_string(),
                "The request took too long. Please check if the backend is running and try again.".to_string(),
            ),
            ApiError::Server { .. } => (
                "Server Error".to_string(),
                "Something went wrong on the server. Please try again later.".to_string(),
            ),
            ApiError::Network { base_url, .. } => (
                "Connection Error".to_string(),
                format!(
                    "Unable to connect to the server. Please make sure the backend is running on {}",
                    base_url
                ),
            ),
            _ => (
                failure_title.to_string(),
                err.backend_message()
                    .unwrap_or("An unexpected error occurred. Please try again.")
                    .to_string(),
            ),
        };

        Self {
            level: NoticeLevel::Error,
            title,
            message,
            category: Some(err.category()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.message)
        }
    }
}

/// Surface notices are delivered to
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::error!(%notice, "notice"),
            NoticeLevel::Warning => tracing::warn!(%notice, "notice"),
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!(%notice, "notice"),
        }
    }
}

/// Notifier that keeps every notice for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<Notice> {
        self.notices().into_iter().filter(|n| n.category.is_some()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
