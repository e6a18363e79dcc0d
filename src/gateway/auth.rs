//! Static authorization client
//!
//! Answers from configured allow/deny lists; anything else stays pending.

use crate::gateway::{AuthService, Verdict};
use log::debug;

pub struct StaticAuthService {
    allowed: Vec<String>,
    denied: Vec<String>,
}

impl StaticAuthService {
    pub fn new(allowed: &[String], denied: &[String]) -> Self {
        Self {
            allowed: allowed.iter().map(|m| m.to_ascii_lowercase()).collect(),
            denied: denied.iter().map(|m| m.to_ascii_lowercase()).collect(),
        }
    }
}

impl AuthService for StaticAuthService {
    fn request(&self, ip: &str, mac: &str) -> Verdict {
        let mac = mac.to_ascii_lowercase();
        let verdict = if self.denied.contains(&mac) {
            Verdict::Denied
        } else if self.allowed.contains(&mac) {
            Verdict::Allowed
        } else {
            Verdict::Pending
        };
        debug!("Authorization for {} ({}): {:?}", mac, ip, verdict);
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_case_insensitive_and_deny_wins() {
        let service = StaticAuthService::new(
            &["AA:BB:CC:DD:EE:FF".to_string(), "11:22:33:44:55:66".to_string()],
            &["11:22:33:44:55:66".to_string()],
        );

        assert_eq!(service.request("10.0.0.5", "aa:bb:cc:dd:ee:ff"), Verdict::Allowed);
        assert_eq!(service.request("10.0.0.6", "11:22:33:44:55:66"), Verdict::Denied);
        assert_eq!(service.request("10.0.0.7", "00:00:00:00:00:01"), Verdict::Pending);
    }
}
