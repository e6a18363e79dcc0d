//! Configuration management for the gateway control plane
//!
//! Values come from built-in defaults, an optional TOML file and
//! `GATEWAY_CTL_*` environment overrides, in that order of precedence.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default configuration file name (without extension)
pub const DEFAULT_CONFIG_FILE: &str = "gateway-ctl";

/// Environment prefix for overrides
const ENV_PREFIX: &str = "GATEWAY_CTL";

/// Complete control plane configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Path of the control socket administrators connect to
    #[serde(default = "default_control_socket")]
    pub control_socket: String,

    /// Path of the one-shot socket used to hand clients to a restarted instance
    #[serde(default = "default_internal_socket")]
    pub internal_socket: String,

    /// Address argument handed to the firewall when `reset` denies a client
    #[serde(default = "default_gateway_address")]
    pub gateway_address: String,

    /// Kernel ARP table consulted when `auth` is given `0.0.0.0`
    #[serde(default = "default_arp_table")]
    pub arp_table: String,

    /// External rule helper; rules are only logged when unset
    #[serde(default)]
    pub firewall_command: Option<String>,

    /// MACs the built-in authorization client always allows
    #[serde(default)]
    pub allowed_macs: Vec<String>,

    /// MACs the built-in authorization client always denies
    #[serde(default)]
    pub denied_macs: Vec<String>,

    /// Delay before a pending authorization is asked again
    #[serde(default = "default_auth_retry_secs")]
    pub auth_retry_secs: u64,

    /// Number of attempts before a pending authorization is dropped
    #[serde(default = "default_auth_retry_limit")]
    pub auth_retry_limit: u32,
}

fn default_control_socket() -> String {
    "/tmp/wdctl.sock".to_string()
}

fn default_internal_socket() -> String {
    "/tmp/wifidog.sock".to_string()
}

fn default_gateway_address() -> String {
    "192.168.1.1".to_string()
}

fn default_arp_table() -> String {
    "/proc/net/arp".to_string()
}

fn default_auth_retry_secs() -> u64 {
    30
}

fn default_auth_retry_limit() -> u32 {
    5
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            control_socket: default_control_socket(),
            internal_socket: default_internal_socket(),
            gateway_address: default_gateway_address(),
            arp_table: default_arp_table(),
            firewall_command: None,
            allowed_macs: Vec::new(),
            denied_macs: Vec::new(),
            auth_retry_secs: default_auth_retry_secs(),
            auth_retry_limit: default_auth_retry_limit(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from `path` (optional on disk) with environment overrides
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: GatewayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.control_socket.is_empty() {
            return Err(config::ConfigError::Message(
                "control_socket cannot be empty".into(),
            ));
        }

        if self.internal_socket.is_empty() {
            return Err(config::ConfigError::Message(
                "internal_socket cannot be empty".into(),
            ));
        }

        if Path::new(&self.control_socket) == Path::new(&self.internal_socket) {
            return Err(config::ConfigError::Message(
                "control_socket and internal_socket must differ".into(),
            ));
        }

        if self.auth_retry_secs == 0 {
            return Err(config::ConfigError::Message(
                "auth_retry_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Delay between pending authorization attempts
    pub fn auth_retry_interval(&self) -> Duration {
        Duration::from_secs(self.auth_retry_secs)
    }
}
