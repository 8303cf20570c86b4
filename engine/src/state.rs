//! Diagnostics session state: owns the status indicator value and the issue set.
//!
//! Every mutation notifies subscribers synchronously with the new snapshot.
//! There is no coalescing: two mutations mean two notifications.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use moji_types::{DetectionRecord, DetectionStatus, IssueSet, SessionSnapshot, SessionStatus};

/// Receives a snapshot after every session change.
///
/// Called while the session serializes deliveries, so implementations may
/// read [`DiagnosticsSession::snapshot`] but must not mutate the session.
pub trait SessionObserver: Send + Sync {
    fn session_changed(&self, snapshot: &SessionSnapshot);
}

#[derive(Default)]
struct SessionState {
    status: SessionStatus,
    issues: Arc<IssueSet>,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.status.clone(), Arc::clone(&self.issues))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Every update is a single assignment, so a panicking observer cannot
    // leave the state half-written.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
pub struct DiagnosticsSession {
    state: Mutex<SessionState>,
    observers: Mutex<Vec<Arc<dyn SessionObserver>>>,
    /// Held from mutation through delivery so observers see changes in order.
    delivery: Mutex<()>,
}

impl DiagnosticsSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        lock(&self.observers).push(observer);
    }

    pub fn set_session_status(&self, status: DetectionStatus, encoding: impl Into<String>) {
        let status = SessionStatus::detected(status, encoding);
        self.mutate(|state| state.status = status);
    }

    /// Same as [`set_session_status`](Self::set_session_status), keeping the
    /// record's own status token for display.
    pub fn set_status_from_record(&self, record: &DetectionRecord) {
        let status = SessionStatus::from_record(record);
        self.mutate(|state| state.status = status);
    }

    pub fn clear_session_status(&self) {
        self.mutate(|state| state.status = SessionStatus::Empty);
    }

    /// Replace the issue set wholesale. The only way it ever changes.
    pub fn replace_issue_set(&self, records: Vec<DetectionRecord>) {
        let issues = Arc::new(IssueSet::new(records));
        self.mutate(|state| state.issues = issues);
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.state).snapshot()
    }

    fn mutate(&self, apply: impl FnOnce(&mut SessionState)) {
        let _delivery = lock(&self.delivery);
        let snapshot = {
            let mut state = lock(&self.state);
            apply(&mut state);
            state.snapshot()
        };
        let observers = lock(&self.observers).clone();
        for observer in observers {
            observer.session_changed(&snapshot);
        }
    }
}
