use std::path::PathBuf;

use moji_tool::ToolError;
use thiserror::Error;

use crate::host::HostError;

/// Why a signal chain stopped. Whatever state existed before the failing step
/// is left as it was.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Tool(#[from] ToolError),
    /// The detect that follows a successful rewrite failed. The file on disk
    /// has already changed.
    #[error(transparent)]
    Redetect(ToolError),
    #[error("reload of {} failed: {source}", .path.display())]
    Reload {
        path: PathBuf,
        #[source]
        source: HostError,
    },
    #[error("could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: HostError,
    },
    #[error("File type not supported for encoding {action}")]
    Unsupported { path: PathBuf, action: &'static str },
    #[error("No workspace folder open")]
    NoWorkspace,
}

impl EngineError {
    /// Failures that are the user's input rather than the tool's or host's.
    /// Their message is shown without a chain prefix.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Unsupported { .. } | Self::NoWorkspace)
    }
}
