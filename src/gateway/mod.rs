//! External collaborators of the control plane
//!
//! The firewall, upstream authorization, ARP lookup, retry timer and status
//! report are reached through the traits below so the control handlers can
//! run against the real backends or against test doubles.

pub mod arp;
pub mod auth;
pub mod firewall;
pub mod retry;
pub mod status;

use async_trait::async_trait;
use std::sync::Arc;

use crate::client::ClientRecord;
use crate::config::GatewayConfig;
use crate::error::FirewallError;

pub use arp::ArpTable;
pub use auth::StaticAuthService;
pub use firewall::CommandFirewall;
pub use retry::{DelayedRetry, PendingAuth, run_retry_worker};
pub use status::GatewayStatus;

/// Direction of a firewall rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FwAction {
    Allow,
    Deny,
}

impl FwAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FwAction::Allow => "allow",
            FwAction::Deny => "deny",
        }
    }
}

/// Verdict returned by the upstream authorization service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied,
    Pending,
}

/// Applies access and portal-redirect rules for a client
#[async_trait]
pub trait Firewall: Send + Sync {
    /// Access rules are keyed on the MAC; the address is optional.
    async fn access(&self, action: FwAction, ip: Option<&str>, mac: &str)
    -> Result<(), FirewallError>;

    async fn redirect(&self, action: FwAction, ip: &str, mac: &str) -> Result<(), FirewallError>;
}

/// Asks the upstream service whether a client may pass
pub trait AuthService: Send + Sync {
    fn request(&self, ip: &str, mac: &str) -> Verdict;
}

/// Resolves a MAC address to the IP currently bound to it
pub trait ArpResolver: Send + Sync {
    fn ip_for_mac(&self, mac: &str) -> Option<String>;
}

/// Re-evaluates a pending authorization later
pub trait RetryScheduler: Send + Sync {
    fn schedule(&self, pending: PendingAuth);
}

/// Renders the text returned by the `status` command
pub trait StatusReporter: Send + Sync {
    fn render(&self, clients: &[ClientRecord]) -> String;
}

/// Bundle of collaborators handed to every control handler
#[derive(Clone)]
pub struct Gateway {
    pub firewall: Arc<dyn Firewall>,
    pub auth: Arc<dyn AuthService>,
    pub arp: Arc<dyn ArpResolver>,
    pub retry: Arc<dyn RetryScheduler>,
    pub status: Arc<dyn StatusReporter>,
}

impl Gateway {
    /// Wires the built-in collaborators from configuration.
    pub fn from_config(
        config: &GatewayConfig,
        retry: DelayedRetry,
        restarted_from: Option<i32>,
    ) -> Self {
        Self {
            firewall: Arc::new(CommandFirewall::new(config.firewall_command.clone())),
            auth: Arc::new(StaticAuthService::new(
                &config.allowed_macs,
                &config.denied_macs,
            )),
            arp: Arc::new(ArpTable::new(&config.arp_table)),
            retry: Arc::new(retry),
            status: Arc::new(GatewayStatus::new(restarted_from)),
        }
    }
}
