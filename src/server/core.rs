use log::{debug, error, info};
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use std::sync::Arc;
use tokio::net::UnixListener;

use crate::error::ControlError;
use crate::server::context::ControlContext;
use crate::server::handler::handle_connection;

/// Longest socket path the platform accepts, leaving room for the NUL.
pub fn max_socket_path_len() -> usize {
    std::mem::size_of::<libc::sockaddr_un>() - std::mem::size_of::<libc::sa_family_t>() - 1
}

/// Binds a listening Unix socket at `path`, replacing any stale socket file.
pub fn bind_local_socket(path: &str) -> Result<UnixListener, ControlError> {
    if path.len() > max_socket_path_len() {
        return Err(ControlError::SocketPathTooLong(path.to_string()));
    }

    match std::fs::remove_file(path) {
        Ok(()) => debug!("Removed stale socket {}", path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(ControlError::BindFailed(path.to_string(), e)),
    }

    UnixListener::bind(Path::new(path)).map_err(|e| ControlError::BindFailed(path.to_string(), e))
}

pub struct ControlServer {
    listener: UnixListener,
    context: Arc<ControlContext>,
}

impl ControlServer {
    /// Binds the configured control socket. Failure here is fatal for the daemon.
    pub fn bind(context: Arc<ControlContext>) -> Result<Self, ControlError> {
        let path = context.config.control_socket.clone();
        let listener = bind_local_socket(&path)?;
        info!("Control socket bound to {}", path);

        Ok(Self { listener, context })
    }

    /// Descriptor of the listening socket, closed by a re-executing child.
    pub fn listener_fd(&self) -> RawFd {
        self.listener.as_raw_fd()
    }

    /// Accepts control connections forever.
    ///
    /// Each connection gets its own detached task; a failed accept is logged
    /// and the loop keeps serving.
    pub async fn start(&self) {
        info!("Accepting control connections on {}", self.context.config.control_socket);
        let listener_fd = self.listener_fd();

        loop {
            match self.listener.accept().await {
                Ok((stream, _)) => {
                    debug!("Accepted connection on control socket {}", stream.as_raw_fd());
                    let context = Arc::clone(&self.context);

                    tokio::spawn(async move {
                        handle_connection(stream, context, listener_fd).await;
                    });
                }
                Err(e) => {
                    error!("Accept failed on control socket: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_limit_matches_sockaddr() {
        // Linux sun_path is 108 bytes
        #[cfg(target_os = "linux")]
        assert_eq!(max_socket_path_len(), 107);
    }

    #[tokio::test]
    async fn test_bind_rejects_long_path() {
        let path = format!("/tmp/{}", "x".repeat(max_socket_path_len()));
        match bind_local_socket(&path) {
            Err(ControlError::SocketPathTooLong(p)) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_bind_replaces_stale_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctl.sock");
        let path = path.to_str().unwrap();

        let first = bind_local_socket(path).unwrap();
        drop(first);
        assert!(Path::new(path).exists());

        let second = bind_local_socket(path);
        assert!(second.is_ok());
    }
}
