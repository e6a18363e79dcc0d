//! Firewall backend
//!
//! Hands each rule to an external helper as
//! `<cmd> <access|redirect> <allow|deny> <ip|-> <mac>`. Without a helper the
//! rule is only logged.

use crate::error::FirewallError;
use crate::gateway::{Firewall, FwAction};
use async_trait::async_trait;
use log::{debug, info};
use tokio::process::Command;

pub struct CommandFirewall {
    command: Option<String>,
}

impl CommandFirewall {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    async fn apply(&self, kind: &str, action: FwAction, ip: &str, mac: &str) -> Result<(), FirewallError> {
        let Some(cmd) = &self.command else {
            info!("Firewall {} {} for {} ({}) [no backend]", kind, action.as_str(), mac, ip);
            return Ok(());
        };

        debug!("Running {} {} {} {} {}", cmd, kind, action.as_str(), ip, mac);
        let status = Command::new(cmd)
            .args([kind, action.as_str(), ip, mac])
            .status()
            .await
            .map_err(|e| FirewallError::SpawnFailed(cmd.clone(), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(FirewallError::CommandFailed(cmd.clone(), status.code()))
        }
    }
}

#[async_trait]
impl Firewall for CommandFirewall {
    async fn access(
        &self,
        action: FwAction,
        ip: Option<&str>,
        mac: &str,
    ) -> Result<(), FirewallError> {
        self.apply("access", action, ip.unwrap_or("-"), mac).await
    }

    async fn redirect(&self, action: FwAction, ip: &str, mac: &str) -> Result<(), FirewallError> {
        self.apply("redirect", action, ip, mac).await
    }
}
