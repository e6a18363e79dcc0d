//! Input validation utilities
//!
//! Checks the address tokens carried by control requests.

use std::net::Ipv4Addr;

/// Longest textual MAC address, `aa:bb:cc:dd:ee:ff`
pub const MAX_MAC_LEN: usize = 17;

/// Longest textual IPv4 address, `255.255.255.255`
pub const MAX_IP_LEN: usize = 15;

/// Validate a colon-separated 48-bit MAC address
pub fn is_valid_mac(mac: &str) -> bool {
    if mac.len() != MAX_MAC_LEN {
        return false;
    }
    let octets: Vec<&str> = mac.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Validate a dotted-quad IPv4 address
pub fn is_valid_ip(ip: &str) -> bool {
    ip.len() <= MAX_IP_LEN && ip.parse::<Ipv4Addr>().is_ok()
}
