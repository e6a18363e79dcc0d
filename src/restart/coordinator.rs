//! Live restart hand-off
//!
//! Phase one binds a one-shot internal socket and forks; the child becomes a
//! fresh instance of this program. Phase two, in the old instance, waits for
//! that instance to dial back, streams every client under the registry lock
//! and then shuts this process down.

use log::{debug, error, info};
use nix::unistd::{ForkResult, Pid, close, fork, setsid};
use std::ffi::{CString, OsString};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{AsRawFd, RawFd};
use tokio::io::AsyncWriteExt;
use tokio::net::{UnixListener, UnixStream};

use crate::client::SharedRegistry;
use crate::error::RestartError;
use crate::restart::snapshot;
use crate::server::ControlContext;
use crate::server::bind_local_socket;
use crate::server::handler::close_connection;
use crate::utils::process::terminate_self;

/// Program and argument vector for the replacement, ready before the fork so
/// the child never allocates.
pub struct ExecPlan {
    program: CString,
    argv: Vec<CString>,
}

impl ExecPlan {
    /// Runs the program named by `argv[0]`, found through `PATH` when it
    /// carries no slash, so a binary replaced on disk is the one started.
    pub fn new(args: &[OsString]) -> Result<Self, RestartError> {
        let argv = args
            .iter()
            .map(|a| {
                CString::new(a.as_bytes())
                    .map_err(|_| RestartError::InvalidArgument(a.to_string_lossy().into_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let program = argv.first().cloned().ok_or(RestartError::EmptyArgv)?;

        Ok(Self { program, argv })
    }

    pub fn program(&self) -> &CString {
        &self.program
    }

    pub fn argv(&self) -> &[CString] {
        &self.argv
    }
}

/// The bound internal socket, waiting for the replacement to connect.
pub struct PreparedRestart {
    listener: UnixListener,
    path: String,
}

impl PreparedRestart {
    /// Binds the internal socket. Nothing has changed yet if this fails.
    pub fn bind(path: &str) -> Result<Self, RestartError> {
        let listener = bind_local_socket(path)?;
        debug!("Internal socket bound to {}", path);
        Ok(Self {
            listener,
            path: path.to_string(),
        })
    }

    pub fn listener_fd(&self) -> RawFd {
        self.listener.as_raw_fd()
    }

    /// Accepts the single expected connection and streams the registry to it.
    ///
    /// The registry lock is held for the whole transfer so the replacement
    /// sees one consistent point in time. A failed write skips that client.
    /// Returns the number of clients written completely.
    pub async fn hand_off(self, registry: &SharedRegistry) -> Result<usize, RestartError> {
        debug!("Waiting for child to connect on internal socket {}", self.path);
        let (mut conn, _) = self
            .listener
            .accept()
            .await
            .map_err(RestartError::AcceptFailed)?;
        drop(self.listener);

        debug!("Received connection from child, sending existing clients");
        let sent = send_clients(&mut conn, registry).await;

        if let Err(e) = conn.shutdown().await {
            debug!("Internal connection shutdown failed: {}", e);
        }
        Ok(sent)
    }
}

async fn send_clients(conn: &mut UnixStream, registry: &SharedRegistry) -> usize {
    let registry = registry.lock().await;
    let mut sent = 0;

    for client in registry.iter() {
        let line = snapshot::encode(client);
        debug!("Sending to child client data: {}", line.trim_end());

        match conn.write_all(line.as_bytes()).await {
            Ok(()) => sent += 1,
            Err(e) => error!("Failed to write client {} to child: {}", client.mac(), e),
        }
    }

    sent
}

/// Forks; the child closes `inherited`, detaches and execs `plan`.
///
/// Only the parent returns.
fn fork_replacement(plan: &ExecPlan, inherited: &[RawFd]) -> Result<Pid, RestartError> {
    let mut argv: Vec<*const libc::c_char> = plan.argv().iter().map(|a| a.as_ptr()).collect();
    argv.push(std::ptr::null());

    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => Ok(child),
        Ok(ForkResult::Child) => {
            for &fd in inherited {
                let _ = close(fd);
            }
            let _ = setsid();

            // Only async-signal-safe calls from here on
            unsafe {
                libc::execvp(plan.program().as_ptr(), argv.as_ptr());
                libc::_exit(1)
            }
        }
        Err(e) => Err(RestartError::ForkFailed(e)),
    }
}

/// Runs the `restart` command for the connection it arrived on.
///
/// Setup failures return before the fork with this process untouched. Once
/// forked, hand-off failures are logged and this process still terminates.
pub async fn live_restart(
    ctx: &ControlContext,
    conn: &mut UnixStream,
    control_fd: RawFd,
) -> Result<(), RestartError> {
    info!("Will restart myself");

    let plan = ExecPlan::new(&ctx.restart_argv)?;
    let prepared = PreparedRestart::bind(&ctx.config.internal_socket)?;

    debug!("Forking in preparation for exec()");
    let child = fork_replacement(
        &plan,
        &[control_fd, prepared.listener_fd(), conn.as_raw_fd()],
    )?;
    info!("Re-executing myself as {} ({:?})", child, plan.program());

    let result = prepared.hand_off(&ctx.registry).await;
    match &result {
        Ok(sent) => info!("Sent {} clients to child, exiting", sent),
        Err(e) => error!("Hand-off to child failed: {}", e),
    }

    close_connection(conn);
    terminate_self();
    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    use nix::sys::wait::{WaitStatus, waitpid};

    fn plan(args: &[&str]) -> ExecPlan {
        let args: Vec<OsString> = args.iter().map(OsString::from).collect();
        ExecPlan::new(&args).unwrap()
    }

    #[test]
    fn test_exec_plan_runs_argv0() {
        let plan = plan(&["/usr/sbin/gateway-ctl", "-c", "/etc/gw"]);

        let argv: Vec<&str> = plan.argv().iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(argv, vec!["/usr/sbin/gateway-ctl", "-c", "/etc/gw"]);
        assert_eq!(plan.program().to_str().unwrap(), "/usr/sbin/gateway-ctl");
    }

    #[test]
    fn test_exec_plan_requires_program() {
        assert!(matches!(ExecPlan::new(&[]), Err(RestartError::EmptyArgv)));
    }

    #[test]
    fn test_forked_child_execs_program_from_path() {
        let child = fork_replacement(&plan(&["sh", "-c", "exit 7"]), &[]).unwrap();
        assert_eq!(waitpid(child, None).unwrap(), WaitStatus::Exited(child, 7));
    }

    #[test]
    fn test_forked_child_exits_when_exec_fails() {
        let child = fork_replacement(&plan(&["/nonexistent/gateway-ctl"]), &[]).unwrap();
        assert_eq!(waitpid(child, None).unwrap(), WaitStatus::Exited(child, 1));
    }

    #[test]
    fn test_exec_plan_rejects_nul() {
        let args: Vec<OsString> = vec!["gateway-ctl".into(), "bad\0arg".into()];
        assert!(matches!(
            ExecPlan::new(&args),
            Err(RestartError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_bind_failure_aborts_before_fork() {
        let path = format!("/tmp/{}", "y".repeat(200));
        assert!(matches!(
            PreparedRestart::bind(&path),
            Err(RestartError::SocketPathTooLong(_))
        ));
    }
}
