//! Module `state`
//!
//! Defines the `ClientRecord` struct describing one authorized device.

use std::time::{SystemTime, UNIX_EPOCH};

/// One authorized device, keyed by MAC address.
///
/// Timestamps are seconds since the Unix epoch. The control plane only
/// creates, copies and removes records; it never touches the timestamps
/// of a live record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    mac: String,
    ip: String,
    start_time: u64,
    last_updated: u64,
}

impl ClientRecord {
    /// Creates a record authorized now.
    pub fn new(ip: &str, mac: &str) -> Self {
        let now = unix_now();
        Self::with_times(ip, mac, now, now)
    }

    /// Creates a record with explicit timestamps, as restored from a hand-off.
    pub fn with_times(ip: &str, mac: &str, start_time: u64, last_updated: u64) -> Self {
        Self {
            mac: mac.to_string(),
            ip: ip.to_string(),
            start_time,
            last_updated,
        }
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// When the client was authorized.
    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Last activity time, maintained outside the control plane.
    pub fn last_updated(&self) -> u64 {
        self.last_updated
    }
}

/// Current time in whole seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
