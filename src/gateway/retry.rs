//! Pending authorization retries
//!
//! Pending verdicts are queued to a background task which waits the
//! configured interval and runs the authorization again.

use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::gateway::RetryScheduler;
use crate::protocol::authorize;
use crate::server::ControlContext;

/// An authorization to evaluate again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuth {
    pub ip: String,
    pub mac: String,
    /// Rounds already run for this client
    pub attempt: u32,
}

/// Scheduler feeding the retry worker
#[derive(Clone)]
pub struct DelayedRetry {
    tx: mpsc::UnboundedSender<PendingAuth>,
}

impl DelayedRetry {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PendingAuth>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RetryScheduler for DelayedRetry {
    fn schedule(&self, pending: PendingAuth) {
        if let Err(e) = self.tx.send(pending) {
            warn!("Retry worker gone, dropping pending auth for {}", e.0.mac);
        }
    }
}

/// Runs pending authorizations again until they settle or the limit is hit.
pub async fn run_retry_worker(mut rx: mpsc::UnboundedReceiver<PendingAuth>, ctx: Arc<ControlContext>) {
    let interval = ctx.config.auth_retry_interval();
    let limit = ctx.config.auth_retry_limit;

    while let Some(pending) = rx.recv().await {
        if pending.attempt >= limit {
            warn!(
                "Giving up on {} ({}) after {} attempts",
                pending.mac, pending.ip, pending.attempt
            );
            continue;
        }

        debug!("Retrying auth for {} in {:?}", pending.mac, interval);
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            authorize(&ctx, &pending.ip, &pending.mac, pending.attempt + 1).await;
        });
    }
}
