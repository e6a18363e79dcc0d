//! Client registry
//!
//! Ordered collection of authorized clients, unique by MAC address.

use crate::client::ClientRecord;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registry shared between the listener, every handler and the restart hand-off.
///
/// Every traversal or mutation happens under the one mutex; guards are scoped
/// so the lock is released on every exit path.
pub type SharedRegistry = Arc<Mutex<ClientRegistry>>;

/// Builds an empty shared registry
pub fn new_shared_registry() -> SharedRegistry {
    Arc::new(Mutex::new(ClientRegistry::new()))
}

/// Registry of authorized clients in insertion order
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: Vec<ClientRecord>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
        }
    }

    /// Appends a new record for `mac` unless one already exists.
    ///
    /// Returns `true` when a record was inserted.
    pub fn append(&mut self, ip: &str, mac: &str) -> bool {
        self.insert(ClientRecord::new(ip, mac))
    }

    /// Inserts a prepared record unless its MAC is already present.
    pub fn insert(&mut self, record: ClientRecord) -> bool {
        if self.find_by_mac(record.mac()).is_some() {
            return false;
        }
        self.clients.push(record);
        true
    }

    pub fn find_by_mac(&self, mac: &str) -> Option<&ClientRecord> {
        self.clients.iter().find(|c| c.mac() == mac)
    }

    /// Restored records may carry an empty IP, which never matches.
    pub fn find_by_ip(&self, ip: &str) -> Option<&ClientRecord> {
        if ip.is_empty() {
            return None;
        }
        self.clients.iter().find(|c| c.ip() == ip)
    }

    /// Removes and returns the record for `mac`, if any.
    pub fn remove_by_mac(&mut self, mac: &str) -> Option<ClientRecord> {
        let pos = self.clients.iter().position(|c| c.mac() == mac)?;
        Some(self.clients.remove(pos))
    }

    /// Looks a client up by IP first, then by MAC, using the same identifier.
    pub fn find_by_ip_or_mac(&self, id: &str) -> Option<&ClientRecord> {
        self.find_by_ip(id).or_else(|| self.find_by_mac(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientRecord> {
        self.clients.iter()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
