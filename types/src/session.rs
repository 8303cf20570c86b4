//! Values owned by the diagnostics session and handed out as snapshots.

use std::sync::Arc;

use crate::detection::{DetectionRecord, DetectionStatus};

/// The single-file indicator for the focused document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No active file, or the active file is not processable.
    #[default]
    Empty,
    Detected {
        status: DetectionStatus,
        /// Status as the tool spelled it, shown in the indicator tooltip.
        token: String,
        encoding: String,
    },
}

impl SessionStatus {
    #[must_use]
    pub fn detected(status: DetectionStatus, encoding: impl Into<String>) -> Self {
        Self::Detected {
            status,
            token: status.label().to_string(),
            encoding: encoding.into(),
        }
    }

    #[must_use]
    pub fn from_record(record: &DetectionRecord) -> Self {
        Self::Detected {
            status: record.status(),
            token: record.status_token().to_string(),
            encoding: record.source_encoding().to_string(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn status(&self) -> Option<DetectionStatus> {
        match self {
            Self::Empty => None,
            Self::Detected { status, .. } => Some(*status),
        }
    }

    /// Empty string when there is no status.
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Detected { token, .. } => token,
        }
    }

    /// Empty string when there is no status.
    #[must_use]
    pub fn encoding(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Detected { encoding, .. } => encoding,
        }
    }
}

/// Files flagged by one workspace scan, in tool output order.
///
/// Only ever replaced as a whole; there is no way to add or remove a single
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueSet {
    records: Vec<DetectionRecord>,
}

impl IssueSet {
    #[must_use]
    pub fn new(records: Vec<DetectionRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[DetectionRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a IssueSet {
    type Item = &'a DetectionRecord;
    type IntoIter = std::slice::Iter<'a, DetectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Immutable view of the session, suitable for UI rendering.
///
/// The issue set is shared, so cloning a snapshot never copies records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    status: SessionStatus,
    issues: Arc<IssueSet>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn new(status: SessionStatus, issues: Arc<IssueSet>) -> Self {
        Self { status, issues }
    }

    #[must_use]
    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    #[must_use]
    pub fn issues(&self) -> &IssueSet {
        &self.issues
    }

    /// Whether the last scan flagged anything.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
