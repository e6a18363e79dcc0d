//! Client adoption after a live restart
//!
//! The replacement instance dials the internal socket of its predecessor and
//! rebuilds its registry from the snapshot lines it receives.

use log::{debug, info, warn};
use std::io;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixStream;

use crate::client::SharedRegistry;
use crate::error::SnapshotError;
use crate::gateway::ArpResolver;
use crate::restart::snapshot::{self, SnapshotEntry};

/// Reads snapshot lines from the internal socket until end-of-stream.
///
/// Lines that do not parse are logged and skipped.
pub async fn receive_snapshot(path: &str) -> io::Result<Vec<SnapshotEntry>> {
    debug!("Connecting to parent on internal socket {}", path);
    let stream = UnixStream::connect(path).await?;
    let mut lines = BufReader::new(stream).lines();
    let mut entries = Vec::new();

    while let Some(line) = lines.next_line().await? {
        match snapshot::parse(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("Skipping snapshot line [{}]: {}", line, e),
        }
    }

    Ok(entries)
}

/// Receives the predecessor's clients and inserts them into `registry`.
///
/// The IP, which the line format does not carry, is looked up in the ARP
/// table. Returns the number of clients adopted.
pub async fn adopt_clients(
    path: &str,
    registry: &SharedRegistry,
    arp: &dyn ArpResolver,
) -> io::Result<usize> {
    let entries = receive_snapshot(path).await?;
    let mut adopted = 0;

    let mut registry = registry.lock().await;
    for entry in entries {
        let ip = arp.ip_for_mac(&entry.mac).unwrap_or_default();
        let mac = entry.mac.clone();
        if registry.insert(entry.into_record(&ip)) {
            adopted += 1;
        } else {
            warn!("Skipping snapshot entry: {}", SnapshotError::DuplicateClient(mac));
        }
    }
    drop(registry);

    info!("Adopted {} clients from previous instance", adopted);
    Ok(adopted)
}
