//! moji CLI - a terminal editor host for demojibake diagnostics.
//!
//! Each stdin line is one editor event. Events become signals handled on
//! their own task, so a slow scan does not hold up a fix on another file.
//! Session changes are printed as they happen.
//!
//! ```text
//! stdin -> Frontend::run -> Command::parse -> spawn(coordinator.handle(signal))
//!                                                      |
//!                                                      v
//!                                   DiagnosticsSession -> StatusPrinter -> stdout
//! ```

mod command;
mod frontend;
mod terminal;

use anyhow::Result;
use std::{
    env,
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use moji_config::MojiConfig;
use moji_tool::ToolRunner;

use frontend::Frontend;

const LOG_DIR: &str = ".moji";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let mut skipped = Vec::new();
    let opened = log_file_candidates()
        .into_iter()
        .find_map(|candidate| match open_log_file(&candidate) {
            Ok(file) => Some((candidate, file)),
            Err(reason) => {
                skipped.push(reason);
                None
            }
        });

    // Stdout is the session display, so without a log file there are no logs.
    let Some((log_path, file)) = opened else {
        tracing_subscriber::registry().with(env_filter).init();
        return;
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .init();

    tracing::info!(path = %log_path.display(), "Logging initialized");
    for reason in skipped {
        tracing::warn!("{reason}");
    }
}

fn open_log_file(path: &Path) -> Result<File, String> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create log dir {}: {e}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open log file {}: {e}", path.display()))
}

/// `~/.moji/logs/moji.log`, then the same under the working directory.
fn log_file_candidates() -> Vec<PathBuf> {
    let under = |base: PathBuf| base.join(LOG_DIR).join("logs").join("moji.log");
    dirs::home_dir()
        .into_iter()
        .chain(std::iter::once(PathBuf::new()))
        .map(under)
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let config = MojiConfig::load();
    let workspace = env::current_dir().ok();
    tracing::info!(
        workspace = ?workspace.as_deref().map(|p| p.display().to_string()),
        "moji started"
    );

    let frontend = Frontend::new(ToolRunner::default(), config, workspace);
    frontend
        .run(BufReader::new(tokio::io::stdin()))
        .await?;

    tracing::info!("moji stopped");
    Ok(())
}
