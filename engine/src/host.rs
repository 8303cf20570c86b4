//! The editor surface the coordinator drives.
//!
//! Status indicator and flagged-file list rendering are not here: those
//! subscribe to the session as [`SessionObserver`](crate::SessionObserver)s.

use std::future::Future;
use std::path::Path;

use moji_types::ConvertMode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A one-line toast for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    level: NotificationLevel,
    message: String,
}

impl Notification {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn level(&self) -> NotificationLevel {
        self.level
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A host action that could not be completed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait EditorHost: Send + Sync {
    /// Reload `path` from disk. Resolves once the editor shows the new content.
    fn reload(&self, path: &Path) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Open `path` in the editor.
    fn open(&self, path: &Path) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Ask the user for a conversion mode. `None` if the pick was dismissed.
    fn pick_convert_mode(&self) -> impl Future<Output = Option<ConvertMode>> + Send;

    /// Replace the contents of the output pane and show it.
    fn show_output(&self, title: &str, body: &str);

    fn notify(&self, notification: Notification);
}
