//! Control protocol implementation
//!
//! Handles control request parsing, per-command handlers and response literals.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::{authorize, handle_command};
