//! Shared control state
//!
//! Everything a connection handler needs, owned once and shared by `Arc`.

use std::ffi::OsString;
use std::sync::Arc;

use crate::client::SharedRegistry;
use crate::config::GatewayConfig;
use crate::gateway::Gateway;

pub struct ControlContext {
    pub registry: SharedRegistry,
    pub gateway: Gateway,
    pub config: Arc<GatewayConfig>,
    /// Argument vector the replacement process is started with on `restart`
    pub restart_argv: Vec<OsString>,
}

impl ControlContext {
    pub fn new(
        registry: SharedRegistry,
        gateway: Gateway,
        config: Arc<GatewayConfig>,
        restart_argv: Vec<OsString>,
    ) -> Self {
        Self {
            registry,
            gateway,
            config,
            restart_argv,
        }
    }
}
