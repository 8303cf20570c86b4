use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How a conversion to ISO-8859-1 is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertMode {
    /// Report compatibility only; the file is not touched.
    Validate,
    Convert,
    /// Convert, letting the tool replace characters with no ISO-8859-1 form.
    AutoFix,
}

const CONVERT_MODE_VALUES: &[&str] = &["validate", "convert", "autofix"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid conversion mode '{raw}'; expected one of: {expected:?}")]
pub struct ConvertModeParseError {
    raw: String,
    expected: &'static [&'static str],
}

impl ConvertMode {
    pub const ALL: [ConvertMode; 3] = [Self::Validate, Self::Convert, Self::AutoFix];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Convert => "convert",
            Self::AutoFix => "autofix",
        }
    }

    /// Label shown in a quick pick.
    #[must_use]
    pub const fn pick_label(self) -> &'static str {
        match self {
            Self::Validate => "🔍 Validate Compatibility",
            Self::Convert => "🔄 Convert to ISO-8859-1",
            Self::AutoFix => "🔧 Convert with Auto-fix",
        }
    }

    /// Whether this mode rewrites the file on disk.
    #[must_use]
    pub const fn mutates_file(self) -> bool {
        !matches!(self, Self::Validate)
    }
}

impl fmt::Display for ConvertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConvertMode {
    type Err = ConvertModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "validate" => Ok(Self::Validate),
            "convert" => Ok(Self::Convert),
            "autofix" | "auto-fix" => Ok(Self::AutoFix),
            _ => Err(ConvertModeParseError {
                raw: s.to_string(),
                expected: CONVERT_MODE_VALUES,
            }),
        }
    }
}
