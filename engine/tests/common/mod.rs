//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use moji_config::MojiConfig;
use moji_engine::{
    DiagnosticsSession, EditorHost, EventCoordinator, HostError, Notification,
};
use moji_tool::ToolRunner;
use moji_types::ConvertMode;
use tempfile::TempDir;

/// Stand-in for demojibake. Files containing `broken` are reported as
/// windows-1252; writes replace the file content with `fine`.
const FAKE_TOOL: &str = r#"#!/bin/sh
echo "$*" >> '@LOG@'
path=''
out=''
action='detect'
while [ $# -gt 0 ]; do
  case "$1" in
    -path) path="$2"; shift ;;
    -report-output) out="$2"; shift ;;
    -in-place) action='write' ;;
    -validate-only) action='validate' ;;
  esac
  shift
done
classify() {
  if grep -q broken "$1"; then
    echo "WARN | $1 | from=windows-1252 conf=85"
  else
    echo "OK | $1 | from=utf-8 conf=100"
  fi
}
if [ -n "$out" ]; then
  echo '<html>report</html>' > "$out"
  exit 0
fi
case "$action" in
  validate) echo 'All characters are ISO-8859-1 compatible'; exit 0 ;;
  write) echo fine > "$path"; echo "FIX | $path | from=windows-1252 conf=85"; exit 0 ;;
esac
if [ -d "$path" ]; then
  for f in "$path"/*.txt; do classify "$f"; done
  echo 'Scanned files'
else
  if [ ! -f "$path" ]; then
    echo "no such file: $path" >&2
    exit 2
  fi
  classify "$path"
fi
"#;

/// A workspace directory plus a fake tool installed next to it.
pub struct Fixture {
    pub dir: TempDir,
    pub workspace: PathBuf,
    pub tool: PathBuf,
    pub calls_log: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path().join("workspace");
        std::fs::create_dir(&workspace).unwrap();

        let calls_log = dir.path().join("calls.log");
        let tool = dir.path().join("demojibake");
        let script = FAKE_TOOL.replace("@LOG@", &calls_log.to_string_lossy());
        std::fs::write(&tool, script).unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            dir,
            workspace,
            tool,
            calls_log,
        }
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.workspace.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn config(&self) -> MojiConfig {
        MojiConfig {
            binary_path: Some(self.tool.clone()),
            ..MojiConfig::default()
        }
    }

    /// One entry per tool invocation, arguments space-joined.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.calls_log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn coordinator(&self, host: RecordingHost) -> EventCoordinator<ToolRunner, RecordingHost> {
        EventCoordinator::new(
            ToolRunner::default(),
            host,
            Arc::new(DiagnosticsSession::new()),
            self.config(),
        )
    }
}

/// Host that records everything the engine asks of it.
#[derive(Default)]
pub struct RecordingHost {
    pub pick: Option<ConvertMode>,
    pub notifications: Mutex<Vec<Notification>>,
    pub outputs: Mutex<Vec<(String, String)>>,
    pub reloaded: Mutex<Vec<PathBuf>>,
    pub opened: Mutex<Vec<PathBuf>>,
}

impl RecordingHost {
    pub fn picking(mode: ConvertMode) -> Self {
        Self {
            pick: Some(mode),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message().to_string())
            .collect()
    }
}

impl EditorHost for RecordingHost {
    async fn reload(&self, path: &Path) -> Result<(), HostError> {
        if !path.is_file() {
            return Err(HostError::new(format!("{} is gone", path.display())));
        }
        self.reloaded.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn open(&self, path: &Path) -> Result<(), HostError> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn pick_convert_mode(&self) -> Option<ConvertMode> {
        self.pick
    }

    fn show_output(&self, title: &str, body: &str) {
        self.outputs
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }

    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
