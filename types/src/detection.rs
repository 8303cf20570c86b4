//! Detection status and the per-file record parsed from tool output.

use std::fmt;
use std::path::{Path, PathBuf};

/// Encoding label used when the tool output carries none.
pub const UNKNOWN_ENCODING: &str = "unknown";

/// Status token reported by the external tool for one file.
///
/// Parsing is total: anything unrecognized becomes [`DetectionStatus::Unknown`]
/// and renders as informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionStatus {
    Ok,
    Warn,
    Error,
    Fix,
    Unknown,
}

/// Color hint for a rendered status. `None` on [`DetectionStatus::tint`] means
/// the host's default foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTint {
    Warning,
    Error,
}

impl DetectionStatus {
    /// Parse a status token. Case-insensitive, surrounding whitespace ignored.
    ///
    /// The tool writes `ERRO` for per-file failures; it is accepted as an
    /// alias of `ERROR`. `SKIP` has no dedicated rendering and maps to `Unknown`.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("ok") {
            Self::Ok
        } else if token.eq_ignore_ascii_case("warn") {
            Self::Warn
        } else if token.eq_ignore_ascii_case("error") || token.eq_ignore_ascii_case("erro") {
            Self::Error
        } else if token.eq_ignore_ascii_case("fix") {
            Self::Fix
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fix => "FIX",
            Self::Unknown => "UNKNOWN",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✅",
            Self::Warn => "⚠️",
            Self::Error => "❌",
            Self::Fix => "🔧",
            Self::Unknown => "ℹ️",
        }
    }

    #[must_use]
    pub const fn tint(self) -> Option<StatusTint> {
        match self {
            Self::Warn => Some(StatusTint::Warning),
            Self::Error => Some(StatusTint::Error),
            Self::Ok | Self::Fix | Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_warning(self) -> bool {
        self == Self::Warn
    }
}

impl fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One parsed diagnostic line.
///
/// Fields are private; the parser is the intended construction path and
/// consumers read via accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRecord {
    status: DetectionStatus,
    /// Token as the tool wrote it, upper-cased. Distinguishes e.g. `SKIP`
    /// from other tokens that all parse to `Unknown`.
    status_token: String,
    file_path: PathBuf,
    /// Resolved to a concrete label at the parse boundary, never empty.
    source_encoding: String,
    /// 0-100.
    confidence: u8,
}

impl DetectionRecord {
    /// Build a record. An empty encoding becomes [`UNKNOWN_ENCODING`] and the
    /// confidence is clamped to 100.
    #[must_use]
    pub fn new(
        status: DetectionStatus,
        file_path: impl Into<PathBuf>,
        source_encoding: impl Into<String>,
        confidence: u8,
    ) -> Self {
        let source_encoding = source_encoding.into();
        let source_encoding = if source_encoding.trim().is_empty() {
            UNKNOWN_ENCODING.to_string()
        } else {
            source_encoding
        };
        Self {
            status,
            status_token: status.label().to_string(),
            file_path: file_path.into(),
            source_encoding,
            confidence: confidence.min(100),
        }
    }

    /// Keep the tool's own spelling of the status. Blank tokens are ignored.
    #[must_use]
    pub fn with_status_token(mut self, token: &str) -> Self {
        let token = token.trim();
        if !token.is_empty() {
            self.status_token = token.to_ascii_uppercase();
        }
        self
    }

    #[must_use]
    pub fn status(&self) -> DetectionStatus {
        self.status
    }

    #[must_use]
    pub fn status_token(&self) -> &str {
        &self.status_token
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    #[must_use]
    pub fn source_encoding(&self) -> &str {
        &self.source_encoding
    }

    #[must_use]
    pub fn confidence(&self) -> u8 {
        self.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── DetectionStatus ────────────────────────────────────────────────

    #[test]
    fn test_from_token_known_values() {
        assert_eq!(DetectionStatus::from_token("OK"), DetectionStatus::Ok);
        assert_eq!(DetectionStatus::from_token("WARN"), DetectionStatus::Warn);
        assert_eq!(DetectionStatus::from_token("ERROR"), DetectionStatus::Error);
        assert_eq!(DetectionStatus::from_token("FIX"), DetectionStatus::Fix);
    }

    #[test]
    fn test_from_token_trims_and_ignores_case() {
        assert_eq!(DetectionStatus::from_token("  warn "), DetectionStatus::Warn);
        assert_eq!(DetectionStatus::from_token("Ok"), DetectionStatus::Ok);
    }

    #[test]
    fn test_from_token_erro_alias() {
        assert_eq!(DetectionStatus::from_token("ERRO"), DetectionStatus::Error);
    }

    #[test]
    fn test_from_token_unknown_degrades() {
        assert_eq!(DetectionStatus::from_token("SKIP"), DetectionStatus::Unknown);
        assert_eq!(DetectionStatus::from_token(""), DetectionStatus::Unknown);
        assert_eq!(
            DetectionStatus::from_token("Arquivos: 3"),
            DetectionStatus::Unknown
        );
    }

    #[test]
    fn test_rendering_policy() {
        assert_eq!(DetectionStatus::Ok.icon(), "✅");
        assert_eq!(DetectionStatus::Warn.icon(), "⚠️");
        assert_eq!(DetectionStatus::Error.icon(), "❌");
        assert_eq!(DetectionStatus::Fix.icon(), "🔧");
        assert_eq!(DetectionStatus::Unknown.icon(), "ℹ️");

        assert_eq!(DetectionStatus::Warn.tint(), Some(StatusTint::Warning));
        assert_eq!(DetectionStatus::Error.tint(), Some(StatusTint::Error));
        assert_eq!(DetectionStatus::Ok.tint(), None);
        assert_eq!(DetectionStatus::Unknown.tint(), None);
    }

    // ── DetectionRecord ────────────────────────────────────────────────

    #[test]
    fn test_record_empty_encoding_becomes_unknown() {
        let record = DetectionRecord::new(DetectionStatus::Warn, "/a.txt", "  ", 10);
        assert_eq!(record.source_encoding(), UNKNOWN_ENCODING);
    }

    #[test]
    fn test_record_keeps_tool_status_token() {
        let record = DetectionRecord::new(DetectionStatus::Unknown, "/a.txt", "utf-8", 0)
            .with_status_token(" skip ");
        assert_eq!(record.status(), DetectionStatus::Unknown);
        assert_eq!(record.status_token(), "SKIP");

        let record = DetectionRecord::new(DetectionStatus::Ok, "/a.txt", "utf-8", 0);
        assert_eq!(record.status_token(), "OK");
        assert_eq!(record.clone().with_status_token("  ").status_token(), "OK");
    }

    #[test]
    fn test_record_confidence_clamped() {
        let record = DetectionRecord::new(DetectionStatus::Warn, "/a.txt", "latin1", 250);
        assert_eq!(record.confidence(), 100);
    }
}
