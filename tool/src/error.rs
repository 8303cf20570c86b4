use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures talking to the external tool. Never retried at this layer.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No candidate location answered the probe. The user has to set
    /// `binary_path` explicitly.
    #[error(
        "demojibake binary not found (tried: {}); set binary_path in the config",
        join_paths(.attempted)
    )]
    BinaryNotFound { attempted: Vec<PathBuf> },
    /// Spawn error or non-zero exit. `code` is `None` for spawn errors and
    /// signal deaths.
    #[error("{} failed: {}", .binary.display(), failure_detail(.code, .stderr, .stdout))]
    InvocationFailed {
        binary: PathBuf,
        code: Option<i32>,
        stderr: String,
        stdout: String,
    },
}

impl ToolError {
    pub(crate) fn spawn(binary: &Path, err: &std::io::Error) -> Self {
        Self::InvocationFailed {
            binary: binary.to_path_buf(),
            code: None,
            stderr: err.to_string(),
            stdout: String::new(),
        }
    }

    /// Captured stderr of a failed invocation, empty otherwise.
    #[must_use]
    pub fn stderr(&self) -> &str {
        match self {
            Self::InvocationFailed { stderr, .. } => stderr,
            Self::BinaryNotFound { .. } => "",
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

/// One line: the first stderr line, else the first stdout line, else the exit code.
fn failure_detail(code: &Option<i32>, stderr: &str, stdout: &str) -> String {
    if let Some(line) = first_line(stderr).or_else(|| first_line(stdout)) {
        return line.to_string();
    }
    match *code {
        Some(code) => format!("exit code {code}"),
        None => "terminated without exit code".to_string(),
    }
}
