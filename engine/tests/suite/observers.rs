//! Observers see every session change with a consistent snapshot.

use std::sync::{Arc, Mutex};

use moji_engine::view::StatusIndicator;
use moji_engine::{SessionObserver, Signal};
use moji_types::SessionSnapshot;

use crate::common::{Fixture, RecordingHost};

#[derive(Default)]
struct Collector(Mutex<Vec<SessionSnapshot>>);

impl SessionObserver for Collector {
    fn session_changed(&self, snapshot: &SessionSnapshot) {
        self.0.lock().unwrap().push(snapshot.clone());
    }
}

#[tokio::test]
async fn test_observer_tracks_focus_changes() {
    let fx = Fixture::new();
    let broken = fx.file("broken.txt", "broken\n");
    let clean = fx.file("clean.txt", "clean\n");
    let c = fx.coordinator(RecordingHost::default());
    let collector = Arc::new(Collector::default());
    c.session().subscribe(collector.clone());

    c.handle(Signal::ActiveFileChanged(Some(broken))).await.unwrap();
    c.handle(Signal::ActiveFileChanged(Some(clean))).await.unwrap();
    c.handle(Signal::ActiveFileChanged(None)).await.unwrap();

    let seen = collector.0.lock().unwrap().clone();
    let texts: Vec<Option<String>> = seen
        .iter()
        .map(|s| StatusIndicator::for_status(s.status(), true).map(|i| i.text))
        .collect();
    assert_eq!(
        texts,
        [
            Some("⚠️ WINDOWS-1252".to_string()),
            Some("✅ UTF-8".to_string()),
            None
        ]
    );
}

#[tokio::test]
async fn test_scan_notifies_once_per_replacement() {
    let fx = Fixture::new();
    fx.file("a.txt", "broken\n");
    let c = fx.coordinator(RecordingHost::default());
    let collector = Arc::new(Collector::default());
    c.session().subscribe(collector.clone());

    c.handle(Signal::ScanRequested(Some(fx.workspace.clone())))
        .await
        .unwrap();

    let seen = collector.0.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].issues().len(), 1);
    assert!(seen[0].status().is_empty());
}
