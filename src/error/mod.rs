//! Error handling
//!
//! Defines error types and handling for the gateway control plane.

pub mod handlers;
pub mod types;

pub use types::*;
