//! Render models for the status indicator and the flagged-file list.
//!
//! Hosts turn a [`SessionSnapshot`](moji_types::SessionSnapshot) into these
//! and draw them with their own widgets.

use std::path::{Path, PathBuf};

use moji_types::{DetectionRecord, IssueSet, SessionStatus, StatusTint};

/// Confidence above which a flagged file is shown as a warning rather than an error.
const HIGH_CONFIDENCE: u8 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub text: String,
    pub tooltip: String,
    pub tint: Option<StatusTint>,
}

impl StatusIndicator {
    /// `None` means the indicator is hidden.
    #[must_use]
    pub fn for_status(status: &SessionStatus, show_status_bar: bool) -> Option<Self> {
        if !show_status_bar {
            return None;
        }
        let SessionStatus::Detected {
            status,
            token,
            encoding,
        } = status
        else {
            return None;
        };
        if encoding.is_empty() {
            return None;
        }
        Some(Self {
            text: format!("{} {}", status.icon(), encoding.to_uppercase()),
            tooltip: format!("Encoding: {encoding} ({token})"),
            tint: status.tint(),
        })
    }
}

/// One row of the flagged-file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueEntry {
    pub label: String,
    pub description: String,
    pub tooltip: String,
    pub tint: StatusTint,
    /// Opened when the entry is activated.
    pub path: PathBuf,
}

impl IssueEntry {
    #[must_use]
    pub fn from_record(record: &DetectionRecord) -> Self {
        let path = record.file_path();
        let encoding = record.source_encoding();
        let confidence = record.confidence();
        Self {
            label: file_label(path),
            description: format!("{encoding} ({confidence}%)"),
            tooltip: format!(
                "{}\nEncoding: {encoding} ({confidence}% confidence)",
                path.display()
            ),
            tint: if confidence > HIGH_CONFIDENCE {
                StatusTint::Warning
            } else {
                StatusTint::Error
            },
            path: path.to_path_buf(),
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[must_use]
pub fn issue_entries(issues: &IssueSet) -> Vec<IssueEntry> {
    issues.iter().map(IssueEntry::from_record).collect()
}
