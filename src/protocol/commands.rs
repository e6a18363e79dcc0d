//! Module `commands`
//!
//! Defines the control commands, their results and the request parser.
//!
//! A request is one line: a keyword followed by whitespace-separated
//! arguments. `auth` keeps its historical layout, `auth <MAC> <IP>`, but its
//! fields are tokenized and validated instead of being cut at fixed offsets.

use crate::error::ParseError;
use crate::utils::validation::{MAX_IP_LEN, MAX_MAC_LEN, is_valid_ip, is_valid_mac};

/// Represents a control command parsed from a request line.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Report gateway state
    Status,
    /// Terminate this process
    Stop,
    /// Remove a client by IP or MAC
    Reset(String),
    /// Re-execute this process, handing the clients over
    Restart,
    /// Ask the authorization service about a client
    Auth { mac: String, ip: String },
    /// Anything else; ignored
    Unknown(String),
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    /// The connection must be handed to the restart coordinator
    Restart,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    /// Success with no reply bytes
    pub fn silent() -> Self {
        Self {
            status: CommandStatus::Success,
            message: None,
        }
    }

    pub fn reply(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            message: Some(message.into()),
        }
    }
}

/// Parses one request line (terminator already stripped) into a `Command`.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let trimmed = line.trim_start();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let keyword = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    match keyword {
        "status" => Ok(Command::Status),
        "stop" => Ok(Command::Stop),
        // An empty identifier is passed through and simply matches nothing
        "reset" => Ok(Command::Reset(rest.to_ascii_lowercase())),
        "restart" => Ok(Command::Restart),
        "auth" => parse_auth(rest),
        other => Ok(Command::Unknown(other.to_string())),
    }
}

fn parse_auth(args: &str) -> Result<Command, ParseError> {
    let mut tokens = args.split_whitespace();
    let mac = tokens.next().ok_or(ParseError::MissingArgument("mac"))?;
    let ip = tokens.next().ok_or(ParseError::MissingArgument("ip"))?;

    if let Some(extra) = tokens.next() {
        return Err(ParseError::UnexpectedArgument(extra.to_string()));
    }

    if mac.len() > MAX_MAC_LEN || !is_valid_mac(mac) {
        return Err(ParseError::InvalidMac(mac.to_string()));
    }

    if ip.len() > MAX_IP_LEN || !is_valid_ip(ip) {
        return Err(ParseError::InvalidIp(ip.to_string()));
    }

    Ok(Command::Auth {
        mac: mac.to_ascii_lowercase(),
        ip: ip.to_string(),
    })
}
