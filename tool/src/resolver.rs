//! Locating the tool executable.
//!
//! An explicit path from the config wins outright and is never probed.
//! Otherwise each candidate is asked for its help text, in order, and the
//! first one that exits cleanly is used. Nothing is cached here.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::ToolError;

/// Command name of the external tool.
pub const TOOL_NAME: &str = "demojibake";

const PROBE_FLAG: &str = "-h";

const PROBE_TIMEOUT_SECS: u64 = 5;

/// Ordered candidate list probed when no explicit path is configured.
#[derive(Debug, Clone)]
pub struct BinaryResolver {
    candidates: Vec<PathBuf>,
}

impl Default for BinaryResolver {
    fn default() -> Self {
        Self::new(Self::default_candidates())
    }
}

impl BinaryResolver {
    #[must_use]
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Bare command, `.exe` command, then the two build-output locations
    /// under `./dist`.
    #[must_use]
    pub fn default_candidates() -> Vec<PathBuf> {
        let dist = env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("dist");
        vec![
            PathBuf::from(TOOL_NAME),
            PathBuf::from(format!("{TOOL_NAME}.exe")),
            dist.join(format!("{TOOL_NAME}.exe")),
            dist.join(TOOL_NAME),
        ]
    }

    #[must_use]
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Resolve the executable to run.
    ///
    /// `explicit` is returned as-is, even if it does not exist; a bad
    /// explicit path surfaces later as an invocation failure.
    pub async fn resolve(&self, explicit: Option<&Path>) -> Result<PathBuf, ToolError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "Using configured demojibake binary");
            return Ok(path.to_path_buf());
        }

        let mut attempted = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            attempted.push(candidate.clone());
            match probe(candidate).await {
                Ok(program) => {
                    tracing::debug!(
                        candidate = %candidate.display(),
                        program = %program.display(),
                        "Resolved demojibake binary"
                    );
                    return Ok(program);
                }
                Err(reason) => {
                    tracing::trace!(candidate = %candidate.display(), %reason, "Probe rejected");
                }
            }
        }

        Err(ToolError::BinaryNotFound { attempted })
    }
}

/// A bare command name is looked up on PATH; anything with a directory part
/// is used as written.
fn locate(candidate: &Path) -> Option<PathBuf> {
    if candidate.components().count() == 1 {
        which::which(candidate).ok()
    } else {
        candidate.is_file().then(|| candidate.to_path_buf())
    }
}

async fn probe(candidate: &Path) -> Result<PathBuf, String> {
    let program = locate(candidate).ok_or_else(|| "not found".to_string())?;

    let mut cmd = Command::new(&program);
    cmd.arg(PROBE_FLAG)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let status = tokio::time::timeout(Duration::from_secs(PROBE_TIMEOUT_SECS), cmd.status())
        .await
        .map_err(|_| "probe timed out".to_string())?
        .map_err(|e| e.to_string())?;

    if status.success() {
        Ok(program)
    } else {
        Err(format!("probe exited with {status}"))
    }
}
