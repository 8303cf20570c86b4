//! Event coordinator: maps editor lifecycle signals to tool invocations and
//! session updates.
//!
//! Each signal is one async chain. A failing step ends its chain, gets
//! reported to the host, and leaves the session as it was before that step.
//! Chains for different signals may be in flight at the same time; the only
//! state they share is the session, whose per-field updates are atomic.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use moji_config::MojiConfig;
use moji_tool::{InvocationRequest, Invoke, Operation, ToolOutput, protocol};
use moji_types::{ConvertMode, DetectionStatus};

use crate::error::EngineError;
use crate::host::{EditorHost, Notification};
use crate::state::DiagnosticsSession;

/// File name of the HTML report, written at the workspace root.
pub const REPORT_FILE_NAME: &str = "encoding-report.html";

/// Encoding assumed when a detect run reports no record for the file.
const FALLBACK_ENCODING: &str = "utf-8";

const REDETECT_FAILURE_PREFIX: &str = "Failed to detect encoding";

const DETECT_OUTPUT_TITLE: &str = "Encoding Detection Result";

const VALIDATE_OUTPUT_TITLE: &str = "ISO-8859-1 Compatibility Check";

/// Editor lifecycle signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    DocumentOpened(PathBuf),
    /// `None` when no editor is focused.
    ActiveFileChanged(Option<PathBuf>),
    /// Workspace root, `None` when no workspace is open.
    ScanRequested(Option<PathBuf>),
    FixRequested(PathBuf),
    ConvertRequested(PathBuf, ConvertMode),
    /// Convert with the mode chosen through a quick pick.
    ConvertPicked(PathBuf),
    /// Verbose detect shown in the output pane.
    DetectRequested(PathBuf),
    ReportRequested(Option<PathBuf>),
}

impl Signal {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DocumentOpened(_) => "document-opened",
            Self::ActiveFileChanged(_) => "active-file-changed",
            Self::ScanRequested(_) => "scan-requested",
            Self::FixRequested(_) => "fix-requested",
            Self::ConvertRequested(..) => "convert-requested",
            Self::ConvertPicked(_) => "convert-picked",
            Self::DetectRequested(_) => "detect-requested",
            Self::ReportRequested(_) => "report-requested",
        }
    }

    fn failure_prefix(&self) -> &'static str {
        match self {
            Self::DocumentOpened(_) | Self::ActiveFileChanged(_) | Self::DetectRequested(_) => {
                "Failed to detect encoding"
            }
            Self::ScanRequested(_) => "Failed to scan workspace",
            Self::FixRequested(_) => "Failed to fix encoding",
            Self::ConvertRequested(..) | Self::ConvertPicked(_) => "Failed to convert",
            Self::ReportRequested(_) => "Failed to generate report",
        }
    }
}

/// Unsupported-file warnings and missing-workspace errors are shown as is;
/// everything else is prefixed with what the chain was trying to do.
fn failure_notification(err: &EngineError, chain_prefix: &str) -> Notification {
    match err {
        EngineError::Unsupported { .. } => Notification::warning(err.to_string()),
        EngineError::NoWorkspace => Notification::error(err.to_string()),
        EngineError::Redetect(_) => {
            Notification::error(format!("{REDETECT_FAILURE_PREFIX}: {err}"))
        }
        _ => Notification::error(format!("{chain_prefix}: {err}")),
    }
}

pub struct EventCoordinator<I, H> {
    invoker: I,
    host: H,
    session: Arc<DiagnosticsSession>,
    config: RwLock<MojiConfig>,
}

impl<I: Invoke, H: EditorHost> EventCoordinator<I, H> {
    pub fn new(invoker: I, host: H, session: Arc<DiagnosticsSession>, config: MojiConfig) -> Self {
        Self {
            invoker,
            host,
            session,
            config: RwLock::new(config),
        }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<DiagnosticsSession> {
        &self.session
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> MojiConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Takes effect for signals handled after this call; chains already in
    /// flight keep the snapshot they started with.
    pub fn update_config(&self, config: MojiConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Run the chain for `signal` to completion.
    ///
    /// Failures are reported to the host as a notification and also returned.
    pub async fn handle(&self, signal: Signal) -> Result<(), EngineError> {
        let name = signal.name();
        let prefix = signal.failure_prefix();
        tracing::debug!(signal = name, "Handling signal");

        let result = self.dispatch(signal).await;
        if let Err(err) = &result {
            if err.is_user_error() {
                tracing::info!(signal = name, "{err}");
            } else {
                tracing::warn!(signal = name, error = %err, "Signal chain failed");
            }
            self.host.notify(failure_notification(err, prefix));
        }
        result
    }

    async fn dispatch(&self, signal: Signal) -> Result<(), EngineError> {
        let config = self.config();
        match signal {
            Signal::DocumentOpened(doc) => {
                if config.auto_detect_on_open {
                    self.refresh_status(&doc, &config).await
                } else {
                    Ok(())
                }
            }
            Signal::ActiveFileChanged(None) => {
                self.session.clear_session_status();
                Ok(())
            }
            Signal::ActiveFileChanged(Some(doc)) => self.refresh_status(&doc, &config).await,
            Signal::ScanRequested(root) => self.scan(root, &config).await,
            Signal::FixRequested(doc) => self.fix(&doc, &config).await,
            Signal::ConvertRequested(doc, mode) => self.convert(&doc, mode, &config).await,
            Signal::ConvertPicked(doc) => match self.host.pick_convert_mode().await {
                Some(mode) => self.convert(&doc, mode, &config).await,
                None => {
                    tracing::debug!(path = %doc.display(), "Conversion pick dismissed");
                    Ok(())
                }
            },
            Signal::DetectRequested(doc) => self.detect_verbose(&doc, &config).await,
            Signal::ReportRequested(root) => self.report(root, &config).await,
        }
    }

    async fn run(
        &self,
        operation: &Operation,
        config: &MojiConfig,
    ) -> Result<ToolOutput, EngineError> {
        let request = InvocationRequest::build(operation, config);
        Ok(self.invoker.invoke(&request).await?)
    }

    /// Detect `doc` and make the result the session status. Unprocessable
    /// files clear the indicator instead.
    async fn refresh_status(&self, doc: &Path, config: &MojiConfig) -> Result<(), EngineError> {
        if !config.is_processable(doc) {
            self.session.clear_session_status();
            return Ok(());
        }

        let operation = Operation::Detect {
            target: doc.to_path_buf(),
            verbose: false,
        };
        let output = self.run(&operation, config).await?;

        match protocol::last_record(&output.stdout) {
            Some(record) => self.session.set_status_from_record(&record),
            None => {
                tracing::debug!(path = %doc.display(), "No detection record, assuming {FALLBACK_ENCODING}");
                self.session
                    .set_session_status(DetectionStatus::Ok, FALLBACK_ENCODING);
            }
        }
        Ok(())
    }

    /// Reload then re-detect. The detect only starts after the host has
    /// acknowledged the reload.
    async fn reload_and_refresh(&self, doc: &Path, config: &MojiConfig) -> Result<(), EngineError> {
        self.host
            .reload(doc)
            .await
            .map_err(|source| EngineError::Reload {
                path: doc.to_path_buf(),
                source,
            })?;
        self.refresh_status(doc, config)
            .await
            .map_err(|err| match err {
                EngineError::Tool(source) => EngineError::Redetect(source),
                other => other,
            })
    }

    async fn scan(&self, root: Option<PathBuf>, config: &MojiConfig) -> Result<(), EngineError> {
        let root = root.ok_or(EngineError::NoWorkspace)?;
        let output = self
            .run(&Operation::DetectWorkspace { root: root.clone() }, config)
            .await?;

        let issues = protocol::warning_records(&output.stdout);
        let count = issues.len();
        tracing::info!(root = %root.display(), count, "Workspace scan finished");
        self.session.replace_issue_set(issues);

        if count > 0 {
            self.host.notify(Notification::warning(format!(
                "Found {count} files with encoding issues. Check the Encoding Issues panel."
            )));
        } else {
            self.host
                .notify(Notification::info("No encoding issues found in workspace!"));
        }
        Ok(())
    }

    async fn fix(&self, doc: &Path, config: &MojiConfig) -> Result<(), EngineError> {
        if !config.is_processable(doc) {
            return Err(EngineError::Unsupported {
                path: doc.to_path_buf(),
                action: "fix",
            });
        }

        self.run(
            &Operation::FixInPlace {
                target: doc.to_path_buf(),
            },
            config,
        )
        .await?;
        tracing::info!(path = %doc.display(), "Encoding fixed");

        self.reload_and_refresh(doc, config).await?;
        self.host
            .notify(Notification::info("Encoding fixed successfully!"));
        Ok(())
    }

    async fn convert(
        &self,
        doc: &Path,
        mode: ConvertMode,
        config: &MojiConfig,
    ) -> Result<(), EngineError> {
        let output = self
            .run(
                &Operation::Convert {
                    target: doc.to_path_buf(),
                    mode,
                },
                config,
            )
            .await?;

        if !mode.mutates_file() {
            self.host.show_output(VALIDATE_OUTPUT_TITLE, &output.stdout);
            return Ok(());
        }

        tracing::info!(path = %doc.display(), %mode, "Converted to ISO-8859-1");
        self.reload_and_refresh(doc, config).await?;
        self.host
            .notify(Notification::info("File converted to ISO-8859-1!"));
        Ok(())
    }

    async fn detect_verbose(&self, doc: &Path, config: &MojiConfig) -> Result<(), EngineError> {
        if !config.is_processable(doc) {
            return Err(EngineError::Unsupported {
                path: doc.to_path_buf(),
                action: "detection",
            });
        }

        let operation = Operation::Detect {
            target: doc.to_path_buf(),
            verbose: true,
        };
        let output = self.run(&operation, config).await?;

        let mut body = output.stdout;
        if !output.stderr.trim().is_empty() {
            if !body.is_empty() && !body.ends_with('\n') {
                body.push('\n');
            }
            body.push_str("=== Errors ===\n");
            body.push_str(&output.stderr);
        }
        self.host.show_output(DETECT_OUTPUT_TITLE, &body);
        Ok(())
    }

    async fn report(&self, root: Option<PathBuf>, config: &MojiConfig) -> Result<(), EngineError> {
        let root = root.ok_or(EngineError::NoWorkspace)?;
        let output_path = root.join(REPORT_FILE_NAME);

        self.run(
            &Operation::Report {
                root,
                output: output_path.clone(),
            },
            config,
        )
        .await?;

        self.host
            .open(&output_path)
            .await
            .map_err(|source| EngineError::Open {
                path: output_path.clone(),
                source,
            })?;
        self.host
            .notify(Notification::info("Report generated and opened!"));
        Ok(())
    }
}
