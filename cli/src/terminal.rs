//! Terminal editor host: prints what an editor would display and answers
//! quick picks from the next stdin line.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use moji_engine::view::{StatusIndicator, issue_entries};
use moji_engine::{EditorHost, HostError, Notification, NotificationLevel, SessionObserver};
use moji_types::{ConvertMode, SessionSnapshot, StatusTint};
use tokio::sync::oneshot;

use crate::command::parse_pick;

#[derive(Debug, Default)]
struct PickSlot {
    /// Where the next input line goes.
    sender: Option<oneshot::Sender<String>>,
    /// Receiver reserved by [`PendingPick::arm`], not yet claimed by a pick.
    armed: Option<oneshot::Receiver<String>>,
}

/// At most one outstanding quick pick. A newer pick dismisses the older one.
#[derive(Debug, Default)]
pub struct PendingPick {
    slot: Mutex<PickSlot>,
    closed: AtomicBool,
}

impl PendingPick {
    fn lock(&self) -> MutexGuard<'_, PickSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve the next input line for a pick that has not started yet.
    ///
    /// The input loop calls this before reading on, so an answer that is
    /// already buffered reaches the pick instead of the command parser.
    pub fn arm(&self) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        let (tx, rx) = oneshot::channel();
        let mut slot = self.lock();
        slot.sender = Some(tx);
        slot.armed = Some(rx);
    }

    fn wait(&self) -> oneshot::Receiver<String> {
        let mut slot = self.lock();
        if let Some(rx) = slot.armed.take() {
            return rx;
        }
        let (tx, rx) = oneshot::channel();
        if !self.closed.load(Ordering::Acquire) {
            slot.sender = Some(tx);
        }
        rx
    }

    /// Hand `line` to the waiting pick. Returns false if none is waiting.
    pub fn answer(&self, line: &str) -> bool {
        let waiting = self.lock().sender.take();
        match waiting {
            Some(tx) => tx.send(line.to_string()).is_ok(),
            None => false,
        }
    }

    /// Dismiss any unanswered pick and every later one. Answers already
    /// given are still delivered.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.lock().sender.take();
    }
}

pub struct TerminalHost {
    picks: Arc<PendingPick>,
}

impl TerminalHost {
    pub fn new(picks: Arc<PendingPick>) -> Self {
        Self { picks }
    }
}

impl EditorHost for TerminalHost {
    /// Nothing is buffered in the terminal; the reload succeeds as long as
    /// the file is still there.
    async fn reload(&self, path: &Path) -> Result<(), HostError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| HostError::new(format!("{}: {e}", path.display())))?;
        if !metadata.is_file() {
            return Err(HostError::new(format!("{} is not a file", path.display())));
        }
        tracing::debug!(path = %path.display(), "Reloaded");
        Ok(())
    }

    async fn open(&self, path: &Path) -> Result<(), HostError> {
        tokio::fs::metadata(path)
            .await
            .map_err(|e| HostError::new(format!("{}: {e}", path.display())))?;
        println!("opened {}", path.display());
        Ok(())
    }

    async fn pick_convert_mode(&self) -> Option<ConvertMode> {
        println!("{}", render_pick_prompt());
        let answer = self.picks.wait().await.ok()?;
        parse_pick(&answer)
    }

    fn show_output(&self, title: &str, body: &str) {
        println!("=== {title} ===\n{}", body.trim_end());
    }

    fn notify(&self, notification: Notification) {
        println!("{}", render_notification(&notification));
    }
}

/// Renders the status indicator and flagged-file list on every change.
#[derive(Debug)]
pub struct StatusPrinter {
    show_status_bar: AtomicBool,
}

impl StatusPrinter {
    pub fn new(show_status_bar: bool) -> Self {
        Self {
            show_status_bar: AtomicBool::new(show_status_bar),
        }
    }

    pub fn set_show_status_bar(&self, show: bool) {
        self.show_status_bar.store(show, Ordering::Relaxed);
    }

    pub fn print(&self, snapshot: &SessionSnapshot) {
        println!(
            "{}",
            render_snapshot(snapshot, self.show_status_bar.load(Ordering::Relaxed))
        );
    }
}

impl SessionObserver for StatusPrinter {
    fn session_changed(&self, snapshot: &SessionSnapshot) {
        self.print(snapshot);
    }
}

fn tint_marker(tint: StatusTint) -> &'static str {
    match tint {
        StatusTint::Warning => "[warning]",
        StatusTint::Error => "[error]",
    }
}

fn render_notification(notification: &Notification) -> String {
    let level = match notification.level() {
        NotificationLevel::Info => "info",
        NotificationLevel::Warning => "warning",
        NotificationLevel::Error => "error",
    };
    format!("[{level}] {}", notification.message())
}

fn render_pick_prompt() -> String {
    let mut prompt = String::from("Select conversion mode:");
    for (i, mode) in ConvertMode::ALL.iter().enumerate() {
        let _ = write!(prompt, "\n  {}. {}", i + 1, mode.pick_label());
    }
    prompt
}

fn render_snapshot(snapshot: &SessionSnapshot, show_status_bar: bool) -> String {
    let mut out = match StatusIndicator::for_status(snapshot.status(), show_status_bar) {
        Some(indicator) => {
            let mut line = format!("status: {} ({})", indicator.text, indicator.tooltip);
            if let Some(tint) = indicator.tint {
                line.push(' ');
                line.push_str(tint_marker(tint));
            }
            line
        }
        None => String::from("status: -"),
    };

    if snapshot.has_issues() {
        let _ = write!(out, "\nencoding issues ({}):", snapshot.issues().len());
        for entry in issue_entries(snapshot.issues()) {
            let _ = write!(
                out,
                "\n  {} {}  {}  {}",
                tint_marker(entry.tint),
                entry.label,
                entry.description,
                entry.path.display()
            );
        }
    }
    out
}
