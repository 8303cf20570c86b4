//! Client for the external `demojibake` encoding tool.
//!
//! Three layers, leaves first: [`BinaryResolver`] finds the executable,
//! [`ToolRunner`] runs one [`InvocationRequest`] to completion, and
//! [`protocol`] turns the captured stdout into
//! [`DetectionRecord`](moji_types::DetectionRecord)s.

mod error;
mod invocation;
pub mod protocol;
mod resolver;

pub use error::ToolError;
pub use invocation::{Invoke, InvocationRequest, Operation, ToolOutput, ToolRunner};
pub use resolver::{BinaryResolver, TOOL_NAME};
