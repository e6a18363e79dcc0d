use log::{debug, error, warn};
use nix::sys::socket::{Shutdown, shutdown};
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use crate::protocol::{CommandStatus, handle_command, parse_command};
use crate::restart::live_restart;
use crate::server::context::ControlContext;

/// Size of the request buffer. The terminator must arrive within it, so a
/// request carries at most `MAX_REQUEST_LEN - 1` bytes.
pub const MAX_REQUEST_LEN: usize = 4096;

/// Reads one control request, up to the first CR or LF.
///
/// Returns `None` when the buffer fills or the peer hangs up before a
/// terminator arrives; such a request is invalid.
pub async fn read_request<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = [0u8; MAX_REQUEST_LEN];
    let mut filled = 0;

    while filled < MAX_REQUEST_LEN {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            return Ok(None);
        }

        if let Some(pos) = buf[filled..filled + n]
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
        {
            let line = String::from_utf8_lossy(&buf[..filled + pos]).into_owned();
            return Ok(Some(line));
        }

        filled += n;
    }

    Ok(None)
}

/// Serves one control connection: one request, one command, then close.
pub async fn handle_connection(mut stream: UnixStream, ctx: Arc<ControlContext>, listener_fd: RawFd) {
    debug!("Entering control handler for {}", stream.as_raw_fd());

    match read_request(&mut stream).await {
        Ok(Some(line)) => {
            debug!("Request received: [{}]", line);
            dispatch(&mut stream, &ctx, listener_fd, &line).await;
        }
        Ok(None) => error!("Invalid control request"),
        Err(e) => error!("Failed to read control request: {}", e),
    }

    close_connection(&stream);
    debug!("Exiting control handler");
}

async fn dispatch(stream: &mut UnixStream, ctx: &ControlContext, listener_fd: RawFd, line: &str) {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => {
            warn!("Rejected control request [{}]: {}", line, e);
            return;
        }
    };

    let result = handle_command(ctx, &command).await;

    match result.status {
        CommandStatus::Restart => {
            if let Err(e) = live_restart(ctx, stream, listener_fd).await {
                error!("Restart failed: {}", e);
            }
        }
        CommandStatus::Success => {
            if let Some(msg) = result.message {
                if let Err(e) = stream.write_all(msg.as_bytes()).await {
                    error!("Write error on control socket: {}", e);
                }
            }
        }
    }
}

/// Shuts a control connection down in both directions; the descriptor is
/// released when the stream is dropped.
pub fn close_connection(stream: &UnixStream) {
    if let Err(e) = shutdown(stream.as_raw_fd(), Shutdown::Both) {
        debug!("Shutdown of control connection failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_ends_at_first_terminator() {
        let mut input: &[u8] = b"status\r\nignored";
        assert_eq!(read_request(&mut input).await.unwrap(), Some("status".to_string()));

        let mut input: &[u8] = b"reset 10.0.0.5\n";
        assert_eq!(
            read_request(&mut input).await.unwrap(),
            Some("reset 10.0.0.5".to_string())
        );
    }

    #[tokio::test]
    async fn test_request_accumulates_partial_reads() {
        let (mut client, mut server) = tokio::io::duplex(64);

        let writer = tokio::spawn(async move {
            client.write_all(b"sta").await.unwrap();
            tokio::task::yield_now().await;
            client.write_all(b"tus\n").await.unwrap();
            client
        });

        let line = read_request(&mut server).await.unwrap();
        assert_eq!(line, Some("status".to_string()));
        drop(writer.await.unwrap());
    }

    #[tokio::test]
    async fn test_unterminated_request_is_invalid() {
        let mut input: &[u8] = b"status";
        assert_eq!(read_request(&mut input).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_full_buffer_without_terminator_is_invalid() {
        let mut data = vec![b'a'; MAX_REQUEST_LEN];
        data.extend_from_slice(b"\n");
        let mut input: &[u8] = &data;
        assert_eq!(read_request(&mut input).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_longest_valid_request() {
        let mut data = vec![b'a'; MAX_REQUEST_LEN - 1];
        data.push(b'\n');
        let mut input: &[u8] = &data;
        let line = read_request(&mut input).await.unwrap().unwrap();
        assert_eq!(line.len(), MAX_REQUEST_LEN - 1);
    }
}
