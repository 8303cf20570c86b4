//! Argument construction and subprocess execution.

use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use moji_config::MojiConfig;
use moji_types::ConvertMode;
use tokio::process::Command;

use crate::error::ToolError;
use crate::resolver::BinaryResolver;

/// Target encoding of the convert operation.
const CONVERT_TARGET_ENCODING: &str = "iso-8859-1";

/// Backup suffix the convert operation always uses, independent of config.
const CONVERT_BACKUP_SUFFIX: &str = ".utf8";

/// One kind of tool call, with its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Detect { target: PathBuf, verbose: bool },
    DetectWorkspace { root: PathBuf },
    FixInPlace { target: PathBuf },
    Convert { target: PathBuf, mode: ConvertMode },
    Report { root: PathBuf, output: PathBuf },
}

impl Operation {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Detect { .. } => "detect",
            Self::DetectWorkspace { .. } => "detect-workspace",
            Self::FixInPlace { .. } => "fix-in-place",
            Self::Convert { .. } => "convert",
            Self::Report { .. } => "report",
        }
    }

    /// File or directory passed as `-path`.
    #[must_use]
    pub fn target(&self) -> &Path {
        match self {
            Self::Detect { target, .. }
            | Self::FixInPlace { target }
            | Self::Convert { target, .. } => target,
            Self::DetectWorkspace { root } | Self::Report { root, .. } => root,
        }
    }
}

/// A fully built tool call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    operation: &'static str,
    binary_override: Option<PathBuf>,
    args: Vec<OsString>,
}

struct ArgList(Vec<OsString>);

impl ArgList {
    fn flag(&mut self, flag: &str) -> &mut Self {
        self.0.push(OsString::from(flag));
        self
    }

    fn value(&mut self, flag: &str, value: impl AsRef<OsStr>) -> &mut Self {
        self.0.push(OsString::from(flag));
        self.0.push(value.as_ref().to_os_string());
        self
    }
}

impl InvocationRequest {
    /// Build the argument list for `operation` from a config snapshot.
    /// The same inputs always produce the same arguments.
    #[must_use]
    pub fn build(operation: &Operation, config: &MojiConfig) -> Self {
        let mut args = ArgList(Vec::new());
        args.value("-path", operation.target());

        match operation {
            Operation::Detect { verbose, .. } => {
                args.flag("-detect");
                if *verbose {
                    args.flag("-v");
                }
            }
            Operation::DetectWorkspace { .. } => {
                args.flag("-detect")
                    .value("-ext", config.extensions_csv())
                    .value("-exclude-dirs", config.exclude_dirs_csv())
                    .flag("-v");
            }
            Operation::FixInPlace { .. } => {
                args.flag("-in-place");
                if config.auto_backup {
                    args.value("-backup-suffix", &config.backup_suffix);
                }
                if config.fix_mojibake {
                    args.flag("-fix-mojibake");
                }
                if config.strip_bom {
                    args.flag("-strip-bom");
                }
            }
            Operation::Convert { mode, .. } => {
                args.value("-to", CONVERT_TARGET_ENCODING);
                match mode {
                    ConvertMode::Validate => {
                        args.flag("-validate-only");
                    }
                    ConvertMode::Convert => {}
                    ConvertMode::AutoFix => {
                        args.flag("-auto-fix");
                    }
                }
                if mode.mutates_file() {
                    args.flag("-in-place")
                        .value("-backup-suffix", CONVERT_BACKUP_SUFFIX);
                }
            }
            Operation::Report { output, .. } => {
                args.flag("-detect")
                    .value("-ext", config.extensions_csv())
                    .value("-report-format", "html")
                    .value("-report-output", output);
            }
        }

        Self {
            operation: operation.name(),
            binary_override: config.binary_path.clone(),
            args: args.0,
        }
    }

    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Configured binary path, if any. `None` means probe.
    #[must_use]
    pub fn binary_override(&self) -> Option<&Path> {
        self.binary_override.as_deref()
    }
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs tool calls. The seam the engine is generic over.
pub trait Invoke: Send + Sync {
    fn invoke(
        &self,
        request: &InvocationRequest,
    ) -> impl Future<Output = Result<ToolOutput, ToolError>> + Send;
}

/// Runs requests as real subprocesses.
///
/// Each call is an independent child process with no shared state, so
/// concurrent calls need no coordination here.
#[derive(Debug, Clone, Default)]
pub struct ToolRunner {
    resolver: BinaryResolver,
}

impl ToolRunner {
    #[must_use]
    pub fn new(resolver: BinaryResolver) -> Self {
        Self { resolver }
    }

    #[must_use]
    pub fn resolver(&self) -> &BinaryResolver {
        &self.resolver
    }
}

impl Invoke for ToolRunner {
    async fn invoke(&self, request: &InvocationRequest) -> Result<ToolOutput, ToolError> {
        let binary = self.resolver.resolve(request.binary_override()).await?;

        tracing::debug!(
            operation = request.operation(),
            binary = %binary.display(),
            args = ?request.args(),
            "Invoking demojibake"
        );

        let mut cmd = Command::new(&binary);
        cmd.args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd
            .output()
            .await
            .map_err(|e| ToolError::spawn(&binary, &e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::debug!(
                operation = request.operation(),
                code = ?output.status.code(),
                "demojibake exited with failure"
            );
            return Err(ToolError::InvocationFailed {
                binary,
                code: output.status.code(),
                stderr,
                stdout,
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }
}
