//! ARP table lookup
//!
//! Reads the kernel ARP table (`/proc/net/arp` layout) to find the IP bound
//! to a MAC address.

use crate::gateway::ArpResolver;
use log::warn;
use std::fs;
use std::path::PathBuf;

pub struct ArpTable {
    path: PathBuf,
}

impl ArpTable {
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
        }
    }
}

impl ArpResolver for ArpTable {
    fn ip_for_mac(&self, mac: &str) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(table) => lookup(&table, mac),
            Err(e) => {
                warn!("Could not read ARP table {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// Finds the IP for `mac` in ARP table text; the first line is a header.
fn lookup(table: &str, mac: &str) -> Option<String> {
    table.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [ip, _hw_type, _flags, hw_addr, ..] if hw_addr.eq_ignore_ascii_case(mac) => {
                Some(ip.to_string())
            }
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
IP address       HW type     Flags       HW address            Mask     Device
192.168.1.10     0x1         0x2         aa:bb:cc:dd:ee:ff     *        br-lan
192.168.1.11     0x1         0x2         11:22:33:44:55:66     *        br-lan
";

    #[test]
    fn test_lookup_matches_case_insensitively() {
        assert_eq!(lookup(TABLE, "AA:BB:CC:DD:EE:FF"), Some("192.168.1.10".to_string()));
        assert_eq!(lookup(TABLE, "11:22:33:44:55:66"), Some("192.168.1.11".to_string()));
        assert_eq!(lookup(TABLE, "00:00:00:00:00:00"), None);
    }

    #[test]
    fn test_header_is_never_matched() {
        assert_eq!(lookup(TABLE, "address"), None);
    }

    #[test]
    fn test_reads_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arp");
        std::fs::write(&path, TABLE).unwrap();

        let arp = ArpTable::new(path.to_str().unwrap());
        assert_eq!(arp.ip_for_mac("aa:bb:cc:dd:ee:ff"), Some("192.168.1.10".to_string()));
        assert_eq!(ArpTable::new("/nonexistent/arp").ip_for_mac("aa:bb:cc:dd:ee:ff"), None);
    }
}
