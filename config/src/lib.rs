//! Configuration for moji.
//!
//! Settings live in `~/.moji/config.toml` (or the file named by `$MOJI_CONFIG`).
//! Every field has a default, so a missing file and an empty file behave the
//! same.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "MOJI_CONFIG";

const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

const DEFAULT_FILE_EXTENSIONS: &[&str] = &[
    ".txt",
    ".md",
    ".java",
    ".xml",
    ".properties",
    ".csv",
    ".html",
    ".js",
    ".ts",
    ".go",
];

const DEFAULT_EXCLUDE_DIRECTORIES: &[&str] =
    &[".git", "node_modules", "dist", "build", "target", "vendor"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Recognized settings. Field names mirror the TOML keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MojiConfig {
    /// Explicit tool location. When set it is trusted without probing.
    pub binary_path: Option<PathBuf>,
    pub auto_detect_on_open: bool,
    pub show_status_bar: bool,
    /// Keep a backup next to files fixed in place.
    pub auto_backup: bool,
    pub backup_suffix: String,
    pub fix_mojibake: bool,
    #[serde(alias = "strip_BOM")]
    pub strip_bom: bool,
    /// Extensions eligible for processing, e.g. `.txt`. The leading dot is optional.
    pub file_extensions: Vec<String>,
    /// Directory names skipped by workspace scans.
    pub exclude_directories: Vec<String>,
}

impl Default for MojiConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            auto_detect_on_open: true,
            show_status_bar: true,
            auto_backup: true,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            fix_mojibake: true,
            strip_bom: true,
            file_extensions: DEFAULT_FILE_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            exclude_directories: DEFAULT_EXCLUDE_DIRECTORIES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Expand `${VAR}` references. Unset variables expand to nothing.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

impl MojiConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        config.binary_path = config
            .binary_path
            .take()
            .and_then(|path| {
                let expanded = expand_env_vars(&path.to_string_lossy());
                let trimmed = expanded.trim();
                (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
            });
        Ok(config)
    }

    /// Load the config file at `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location. Read and parse failures are logged
    /// and fall back to the defaults.
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{err}");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Whether `path` has one of the configured extensions.
    #[must_use]
    pub fn is_processable(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = normalize_extension(ext);
        self.file_extensions
            .iter()
            .any(|configured| normalize_extension(configured) == ext)
    }

    /// Extensions as the comma-separated list the tool's `-ext` flag takes.
    #[must_use]
    pub fn extensions_csv(&self) -> String {
        self.file_extensions
            .iter()
            .map(|ext| {
                let ext = ext.trim();
                if ext.starts_with('.') {
                    ext.to_string()
                } else {
                    format!(".{ext}")
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    #[must_use]
    pub fn exclude_dirs_csv(&self) -> String {
        self.exclude_directories
            .iter()
            .map(|dir| dir.trim())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|home| home.join(".moji").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = MojiConfig::from_toml("").unwrap();
        assert_eq!(config, MojiConfig::default());
        assert!(config.auto_detect_on_open);
        assert!(config.show_status_bar);
        assert_eq!(config.backup_suffix, ".bak");
        assert!(config.binary_path.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = MojiConfig::from_toml(
            r#"
            auto_detect_on_open = false
            file_extensions = ["txt", ".CSV"]
            "#,
        )
        .unwrap();
        assert!(!config.auto_detect_on_open);
        assert!(config.fix_mojibake);
        assert_eq!(config.file_extensions, vec!["txt", ".CSV"]);
    }

    #[test]
    fn test_strip_bom_alias() {
        let config = MojiConfig::from_toml("strip_BOM = false").unwrap();
        assert!(!config.strip_bom);
    }

    #[test]
    fn test_blank_binary_path_means_probe() {
        let config = MojiConfig::from_toml(r#"binary_path = "  ""#).unwrap();
        assert!(config.binary_path.is_none());
    }

    #[test]
    fn test_binary_path_expands_env() {
        // SAFETY: test-local variable name, not read by other tests.
        unsafe { env::set_var("MOJI_TEST_TOOL_DIR", "/opt/tools") };
        let config =
            MojiConfig::from_toml(r#"binary_path = "${MOJI_TEST_TOOL_DIR}/demojibake""#).unwrap();
        assert_eq!(
            config.binary_path,
            Some(PathBuf::from("/opt/tools/demojibake"))
        );
    }

    #[test]
    fn test_expand_env_vars_unterminated() {
        assert_eq!(expand_env_vars("a${b"), "a${b");
        assert_eq!(expand_env_vars("plain"), "plain");
        assert_eq!(expand_env_vars("${}x"), "x");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(MojiConfig::from_toml("auto_backup = \"yes\"").is_err());
    }

    #[test]
    fn test_is_processable_normalizes_extensions() {
        let config = MojiConfig {
            file_extensions: vec!["txt".to_string(), ".CSV".to_string()],
            ..MojiConfig::default()
        };
        assert!(config.is_processable(Path::new("/w/notes.TXT")));
        assert!(config.is_processable(Path::new("/w/data.csv")));
        assert!(!config.is_processable(Path::new("/w/main.rs")));
        assert!(!config.is_processable(Path::new("/w/Makefile")));
    }

    #[test]
    fn test_csv_rendering() {
        let config = MojiConfig {
            file_extensions: vec!["txt".to_string(), ".md".to_string()],
            exclude_directories: vec![".git".to_string(), " node_modules ".to_string()],
            ..MojiConfig::default()
        };
        assert_eq!(config.extensions_csv(), ".txt,.md");
        assert_eq!(config.exclude_dirs_csv(), ".git,node_modules");
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = MojiConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, MojiConfig::default());
    }

    #[test]
    fn test_load_from_reports_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "show_status_bar = 3").unwrap();
        let err = MojiConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
