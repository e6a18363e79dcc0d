//! Live restart
//!
//! Re-executes the daemon while carrying the client registry across through
//! a one-shot internal socket.

pub mod adopt;
pub mod coordinator;
pub mod snapshot;

use std::ffi::OsString;

pub use adopt::{adopt_clients, receive_snapshot};
pub use coordinator::{ExecPlan, PreparedRestart, live_restart};
pub use snapshot::SnapshotEntry;

/// Flag marking an instance started by a live restart
pub const RESTARTED_FROM_FLAG: &str = "--restarted-from";

/// Builds the argument vector for a replacement of process `pid`: the
/// original invocation minus any earlier restart marker, plus a fresh one.
pub fn restart_args<I>(original: I, pid: i32) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let prefixed = format!("{}=", RESTARTED_FROM_FLAG);
    let mut args = Vec::new();
    let mut iter = original.into_iter();

    while let Some(arg) = iter.next() {
        if arg == RESTARTED_FROM_FLAG {
            iter.next();
            continue;
        }
        if arg.to_string_lossy().starts_with(&prefixed) {
            continue;
        }
        args.push(arg);
    }

    args.push(RESTARTED_FROM_FLAG.into());
    args.push(pid.to_string().into());
    args
}
