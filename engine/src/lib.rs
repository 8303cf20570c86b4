//! Diagnostics orchestration for moji.
//!
//! The engine sits between an editor host and the external tool:
//!
//! ```text
//! Signal -> EventCoordinator -> Invoke (moji-tool) -> protocol parser
//!                                   |
//!                                   v
//!                         DiagnosticsSession -> SessionObserver (UI)
//! ```
//!
//! [`DiagnosticsSession`] is the only shared mutable state. Everything the
//! host renders comes from its snapshots.

mod coordinator;
mod error;
mod host;
mod state;
pub mod view;

pub use coordinator::{EventCoordinator, REPORT_FILE_NAME, Signal};
pub use error::EngineError;
pub use host::{EditorHost, HostError, Notification, NotificationLevel};
pub use state::{DiagnosticsSession, SessionObserver};
