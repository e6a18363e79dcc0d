//! Utility functions
//!
//! Provides logging setup, input validation and process control helpers.

pub mod logging;
pub mod process;
pub mod validation;
