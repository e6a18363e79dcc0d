//! Control plane of a captive-portal gateway.
//!
//! Serves the local control socket (`status`, `stop`, `reset`, `auth`,
//! `restart`) and implements the live restart that hands the authorized
//! clients to a freshly executed instance.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod restart;
pub mod server;
pub mod utils;

pub use server::{ControlContext, ControlServer};
