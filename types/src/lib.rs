//! Core domain types for moji.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Detection records flow from the tool parser into the session state; the
//! session snapshot flows out to whatever renders it.

mod detection;
mod mode;
mod session;

pub use detection::{DetectionRecord, DetectionStatus, StatusTint, UNKNOWN_ENCODING};
pub use mode::{ConvertMode, ConvertModeParseError};
pub use session::{IssueSet, SessionSnapshot, SessionStatus};
