//! Error handlers
//!
//! Provides error reporting and exit status mapping for the binary.

use crate::error::types::GatewayCtlError;
use log::error;

/// Log a fatal control plane error
pub fn handle_error(err: &GatewayCtlError) {
    error!("Gateway control error: {}", err);
}

/// Convert an error to the process exit status
pub fn exit_code(err: &GatewayCtlError) -> i32 {
    match err {
        GatewayCtlError::Config(_) => 2,
        GatewayCtlError::Control(_) => 1,
        GatewayCtlError::Io(_) => 1,
    }
}
