//! Status report
//!
//! Renders the free-form text returned by the `status` command.

use crate::client::ClientRecord;
use crate::client::state::unix_now;
use crate::gateway::StatusReporter;
use std::fmt::Write;

pub struct GatewayStatus {
    started_at: u64,
    restarted_from: Option<i32>,
}

impl GatewayStatus {
    pub fn new(restarted_from: Option<i32>) -> Self {
        Self {
            started_at: unix_now(),
            restarted_from,
        }
    }
}

impl StatusReporter for GatewayStatus {
    fn render(&self, clients: &[ClientRecord]) -> String {
        let uptime = unix_now().saturating_sub(self.started_at);
        let mut out = String::new();

        let _ = writeln!(out, "Gateway status\n");
        let _ = writeln!(out, "Version: {}", env!("CARGO_PKG_VERSION"));
        let _ = writeln!(
            out,
            "Uptime: {}d {}h {}m {}s",
            uptime / 86400,
            (uptime % 86400) / 3600,
            (uptime % 3600) / 60,
            uptime % 60
        );
        if let Some(pid) = self.restarted_from {
            let _ = writeln!(out, "Restarted from: {}", pid);
        }
        let _ = writeln!(out, "Clients authorized: {}", clients.len());

        for (i, client) in clients.iter().enumerate() {
            let _ = writeln!(out, "\nClient {}", i);
            let _ = writeln!(out, "  IP: {} MAC: {}", client.ip(), client.mac());
            let _ = writeln!(out, "  Authorized since: {}", client.start_time());
            let _ = writeln!(out, "  Last updated: {}", client.last_updated());
        }

        out
    }
}
