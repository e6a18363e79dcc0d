//! Restart snapshot lines
//!
//! One line per client: `CLIENT|mac=<MAC>|start_time=<u64>|last_updated=<u64>\n`.
//! The reader also accepts an optional `ip=` field and ignores unknown keys.

use crate::client::ClientRecord;
use crate::error::SnapshotError;

const TAG: &str = "CLIENT";

/// A client as carried across a restart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub mac: String,
    pub ip: Option<String>,
    pub start_time: u64,
    pub last_updated: u64,
}

impl SnapshotEntry {
    /// Rebuilds a registry record; `ip` is used when the line carried none.
    pub fn into_record(self, ip: &str) -> ClientRecord {
        let ip = self.ip.as_deref().unwrap_or(ip);
        ClientRecord::with_times(ip, &self.mac, self.start_time, self.last_updated)
    }
}

/// Serializes a record to its snapshot line, newline included.
pub fn encode(client: &ClientRecord) -> String {
    format!(
        "{}|mac={}|start_time={}|last_updated={}\n",
        TAG,
        client.mac(),
        client.start_time(),
        client.last_updated()
    )
}

/// Parses one snapshot line; a trailing newline is allowed.
pub fn parse(line: &str) -> Result<SnapshotEntry, SnapshotError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split('|');

    if fields.next() != Some(TAG) {
        return Err(SnapshotError::MissingTag(line.to_string()));
    }

    let mut mac = None;
    let mut ip = None;
    let mut start_time = None;
    let mut last_updated = None;

    for field in fields {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| SnapshotError::MalformedField(field.to_string()))?;

        match key {
            "mac" => mac = Some(value.to_string()),
            "ip" => ip = Some(value.to_string()),
            "start_time" => start_time = Some(parse_number("start_time", value)?),
            "last_updated" => last_updated = Some(parse_number("last_updated", value)?),
            _ => {}
        }
    }

    Ok(SnapshotEntry {
        mac: mac
            .filter(|m| !m.is_empty())
            .ok_or(SnapshotError::MissingField("mac"))?,
        ip,
        start_time: start_time.ok_or(SnapshotError::MissingField("start_time"))?,
        last_updated: last_updated.ok_or(SnapshotError::MissingField("last_updated"))?,
    })
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, SnapshotError> {
    value
        .parse()
        .map_err(|_| SnapshotError::InvalidNumber(name, value.to_string()))
}
