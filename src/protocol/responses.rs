//! Control responses
//!
//! The only fixed replies on the control channel; every other command either
//! returns free-form text or nothing at all.

/// `reset` found and removed the client
pub const YES: &str = "Yes";

/// `reset` did not find the client
pub const NO: &str = "No";
