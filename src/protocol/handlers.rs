//! Command handlers for the control channel.
//!
//! Each handler takes the shared `ControlContext`, does its registry work
//! under the registry lock and returns the bytes, if any, owed to the caller.

use crate::client::ClientRecord;
use crate::error::FirewallError;
use crate::gateway::{FwAction, PendingAuth, Verdict};
use crate::protocol::responses::{NO, YES};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::server::ControlContext;
use crate::utils::process::terminate_self;
use log::{debug, error, info, warn};

/// Placeholder IP asking the gateway to resolve the client through ARP
pub const UNSPECIFIED_IP: &str = "0.0.0.0";

/// Dispatches a parsed control command to its handler.
pub async fn handle_command(ctx: &ControlContext, command: &Command) -> CommandResult {
    match command {
        Command::Status => handle_cmd_status(ctx).await,
        Command::Stop => handle_cmd_stop(),
        Command::Reset(id) => handle_cmd_reset(ctx, id).await,
        Command::Restart => CommandResult {
            status: CommandStatus::Restart,
            message: None,
        },
        Command::Auth { mac, ip } => {
            authorize(ctx, ip, mac, 1).await;
            CommandResult::silent()
        }
        Command::Unknown(keyword) => {
            debug!("Ignoring unknown control command: {:?}", keyword);
            CommandResult::silent()
        }
    }
}

/// Handles `status`: renders the report from a copy of the registry.
async fn handle_cmd_status(ctx: &ControlContext) -> CommandResult {
    let clients: Vec<ClientRecord> = {
        let registry = ctx.registry.lock().await;
        registry.iter().cloned().collect()
    };

    CommandResult::reply(ctx.gateway.status.render(&clients))
}

/// Handles `stop`: asks this process to shut down, replying nothing.
fn handle_cmd_stop() -> CommandResult {
    info!("Stop requested on control socket");
    terminate_self();
    CommandResult::silent()
}

/// Handles `reset`: removes the client matching `id` as an IP, else as a MAC.
async fn handle_cmd_reset(ctx: &ControlContext, id: &str) -> CommandResult {
    debug!("Entering reset, argument: {}", id);

    let mut registry = ctx.registry.lock().await;

    let Some(mac) = registry.find_by_ip_or_mac(id).map(|c| c.mac().to_string()) else {
        drop(registry);
        debug!("Client {} not found", id);
        return CommandResult::reply(NO);
    };

    registry.remove_by_mac(&mac);
    log_firewall(
        ctx.gateway
            .firewall
            .access(FwAction::Deny, Some(ctx.config.gateway_address.as_str()), &mac)
            .await,
    );
    drop(registry);

    info!("Client {} reset", mac);
    CommandResult::reply(YES)
}

/// Runs one authorization round for a client.
///
/// `attempt` counts rounds for this client, starting at 1; a pending verdict
/// hands the next round to the retry scheduler.
pub async fn authorize(ctx: &ControlContext, ip: &str, mac: &str, attempt: u32) {
    debug!("Authorizing {} ({}), attempt {}", mac, ip, attempt);

    let ipaddr = if ip == UNSPECIFIED_IP {
        match ctx.gateway.arp.ip_for_mac(mac) {
            Some(resolved) => resolved,
            None => {
                warn!("No ARP entry for {}, cannot authorize", mac);
                return;
            }
        }
    } else {
        ip.to_string()
    };

    let firewall = &ctx.gateway.firewall;

    match ctx.gateway.auth.request(&ipaddr, mac) {
        Verdict::Allowed => {
            let inserted = {
                let mut registry = ctx.registry.lock().await;
                registry.append(&ipaddr, mac)
            };

            if inserted {
                log_firewall(firewall.redirect(FwAction::Deny, &ipaddr, mac).await);
                log_firewall(firewall.access(FwAction::Allow, None, mac).await);
            }
            info!("Auth allowed for {} ({})", mac, ipaddr);
        }
        Verdict::Denied => {
            {
                let mut registry = ctx.registry.lock().await;
                registry.remove_by_mac(mac);
            }

            log_firewall(firewall.access(FwAction::Deny, None, mac).await);
            log_firewall(firewall.redirect(FwAction::Deny, &ipaddr, mac).await);
            log_firewall(firewall.redirect(FwAction::Allow, &ipaddr, mac).await);
            info!("Auth denied for {} ({})", mac, ipaddr);
        }
        Verdict::Pending => {
            debug!("Auth pending for {} ({}), scheduling retry", mac, ipaddr);
            ctx.gateway.retry.schedule(PendingAuth {
                ip: ipaddr,
                mac: mac.to_string(),
                attempt,
            });
        }
    }
}

fn log_firewall(result: Result<(), FirewallError>) {
    if let Err(e) = result {
        error!("Firewall update failed: {}", e);
    }
}
