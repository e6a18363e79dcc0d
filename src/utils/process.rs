//! Process control utilities
//!
//! Self-termination and waiting on another instance of the daemon.

use log::{debug, error};
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::{Pid, getpid};
use std::time::Duration;

/// Interval between liveness checks while waiting for a process to exit
const EXIT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Delivers SIGINT to this process, the graceful shutdown path.
pub fn terminate_self() {
    let pid = getpid();
    debug!("Sending SIGINT to self ({})", pid);
    if let Err(e) = kill(pid, Signal::SIGINT) {
        error!("Failed to signal self: {}", e);
    }
}

/// Returns whether a process with this PID still exists.
pub fn is_alive(pid: i32) -> bool {
    !matches!(kill(Pid::from_raw(pid), None), Err(Errno::ESRCH))
}

/// Waits until the process `pid` has exited.
pub async fn wait_for_exit(pid: i32) {
    while is_alive(pid) {
        debug!("Waiting for process {} to exit", pid);
        tokio::time::sleep(EXIT_POLL_INTERVAL).await;
    }
}
