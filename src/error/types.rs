//! Error types
//!
//! Defines domain-specific error types for each part of the control plane.

use std::fmt;
use std::io;

/// Control socket setup errors
#[derive(Debug)]
pub enum ControlError {
    SocketPathTooLong(String),
    BindFailed(String, io::Error),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::SocketPathTooLong(p) => write!(f, "Socket path too long: {}", p),
            ControlError::BindFailed(p, e) => write!(f, "Could not bind socket {}: {}", p, e),
        }
    }
}

impl std::error::Error for ControlError {}

/// Control request parsing errors
#[derive(Debug, PartialEq)]
pub enum ParseError {
    MissingArgument(&'static str),
    UnexpectedArgument(String),
    InvalidMac(String),
    InvalidIp(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingArgument(name) => write!(f, "Missing argument: {}", name),
            ParseError::UnexpectedArgument(arg) => write!(f, "Unexpected argument: {}", arg),
            ParseError::InvalidMac(mac) => write!(f, "Invalid MAC address: {}", mac),
            ParseError::InvalidIp(ip) => write!(f, "Invalid IP address: {}", ip),
        }
    }
}

impl std::error::Error for ParseError {}

/// Live restart errors
#[derive(Debug)]
pub enum RestartError {
    SocketPathTooLong(String),
    BindFailed(String, io::Error),
    InvalidArgument(String),
    EmptyArgv,
    ForkFailed(nix::Error),
    AcceptFailed(io::Error),
}

impl fmt::Display for RestartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartError::SocketPathTooLong(p) => write!(f, "Internal socket path too long: {}", p),
            RestartError::BindFailed(p, e) => {
                write!(f, "Could not bind internal socket {}: {}", p, e)
            }
            RestartError::InvalidArgument(a) => {
                write!(f, "Restart argument contains a NUL byte: {:?}", a)
            }
            RestartError::EmptyArgv => write!(f, "No program to restart: argument vector is empty"),
            RestartError::ForkFailed(e) => write!(f, "Failed to fork: {}", e),
            RestartError::AcceptFailed(e) => write!(f, "Accept failed on internal socket: {}", e),
        }
    }
}

impl std::error::Error for RestartError {}

impl From<ControlError> for RestartError {
    fn from(error: ControlError) -> Self {
        match error {
            ControlError::SocketPathTooLong(p) => RestartError::SocketPathTooLong(p),
            ControlError::BindFailed(p, e) => RestartError::BindFailed(p, e),
        }
    }
}

/// Restart snapshot line errors
#[derive(Debug, PartialEq)]
pub enum SnapshotError {
    MissingTag(String),
    MissingField(&'static str),
    InvalidNumber(&'static str, String),
    MalformedField(String),
    DuplicateClient(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::MissingTag(line) => write!(f, "Not a CLIENT line: {}", line),
            SnapshotError::MissingField(name) => write!(f, "Missing field: {}", name),
            SnapshotError::InvalidNumber(name, value) => {
                write!(f, "Invalid number for {}: {}", name, value)
            }
            SnapshotError::MalformedField(field) => write!(f, "Malformed field: {}", field),
            SnapshotError::DuplicateClient(mac) => write!(f, "Duplicate client: {}", mac),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Firewall backend errors
#[derive(Debug)]
pub enum FirewallError {
    SpawnFailed(String, io::Error),
    CommandFailed(String, Option<i32>),
}

impl fmt::Display for FirewallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirewallError::SpawnFailed(cmd, e) => write!(f, "Could not run {}: {}", cmd, e),
            FirewallError::CommandFailed(cmd, Some(code)) => {
                write!(f, "{} exited with status {}", cmd, code)
            }
            FirewallError::CommandFailed(cmd, None) => {
                write!(f, "{} was terminated by a signal", cmd)
            }
        }
    }
}

impl std::error::Error for FirewallError {}

/// General error that encompasses all error types
#[derive(Debug)]
pub enum GatewayCtlError {
    Config(config::ConfigError),
    Control(ControlError),
    Io(io::Error),
}

impl fmt::Display for GatewayCtlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayCtlError::Config(e) => write!(f, "Configuration error: {}", e),
            GatewayCtlError::Control(e) => write!(f, "Control socket error: {}", e),
            GatewayCtlError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for GatewayCtlError {}

impl From<config::ConfigError> for GatewayCtlError {
    fn from(error: config::ConfigError) -> Self {
        GatewayCtlError::Config(error)
    }
}

impl From<ControlError> for GatewayCtlError {
    fn from(error: ControlError) -> Self {
        GatewayCtlError::Control(error)
    }
}

impl From<io::Error> for GatewayCtlError {
    fn from(error: io::Error) -> Self {
        GatewayCtlError::Io(error)
    }
}
