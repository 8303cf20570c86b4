//! The input loop: one command per line, one task per signal.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use moji_config::MojiConfig;
use moji_engine::{DiagnosticsSession, EventCoordinator, Signal};
use moji_tool::Invoke;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;

use crate::command::{Command, HELP};
use crate::terminal::{PendingPick, StatusPrinter, TerminalHost};

pub struct Frontend<I> {
    coordinator: Arc<EventCoordinator<I, TerminalHost>>,
    picks: Arc<PendingPick>,
    printer: Arc<StatusPrinter>,
    /// Root used by `scan` and `report` when none is given.
    workspace: Option<PathBuf>,
}

impl<I: Invoke + 'static> Frontend<I> {
    pub fn new(invoker: I, config: MojiConfig, workspace: Option<PathBuf>) -> Self {
        let printer = Arc::new(StatusPrinter::new(config.show_status_bar));
        let session = Arc::new(DiagnosticsSession::new());
        session.subscribe(printer.clone());

        let picks = Arc::new(PendingPick::default());
        let coordinator = Arc::new(EventCoordinator::new(
            invoker,
            TerminalHost::new(Arc::clone(&picks)),
            session,
            config,
        ));

        Self {
            coordinator,
            picks,
            printer,
            workspace,
        }
    }

    /// Read commands until `quit` or end of input, then wait for every
    /// chain still in flight.
    pub async fn run<R>(&self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut tasks = JoinSet::new();

        while let Some(line) = lines.next_line().await? {
            while tasks.try_join_next().is_some() {}

            if self.picks.answer(&line) {
                continue;
            }

            match Command::parse(&line, self.workspace.as_deref()) {
                Ok(None) => {}
                Ok(Some(Command::Signal(signal))) => self.spawn_signal(&mut tasks, signal),
                Ok(Some(Command::Status)) => {
                    self.printer.print(&self.coordinator.session().snapshot());
                }
                Ok(Some(Command::ReloadConfig)) => {
                    let config = MojiConfig::load();
                    self.printer.set_show_status_bar(config.show_status_bar);
                    self.coordinator.update_config(config);
                    println!("config reloaded");
                }
                Ok(Some(Command::Help)) => println!("{HELP}"),
                Ok(Some(Command::Quit)) => break,
                Err(err) => eprintln!("Error: {err}"),
            }
        }

        // Nothing will answer a pick once input is gone.
        self.picks.close();
        while tasks.join_next().await.is_some() {}
        Ok(())
    }

    fn spawn_signal(&self, tasks: &mut JoinSet<()>, signal: Signal) {
        // The pick starts inside the task; the line after this one is its
        // answer even if the task has not run yet.
        if matches!(signal, Signal::ConvertPicked(_)) {
            self.picks.arm();
        }

        let coordinator = Arc::clone(&self.coordinator);
        tasks.spawn(async move {
            let name = signal.name();
            // Failures were already shown to the user as notifications.
            if let Err(err) = coordinator.handle(signal).await {
                tracing::debug!(signal = name, error = %err, "Signal chain ended early");
            }
        });
    }
}
