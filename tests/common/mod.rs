#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use gateway_ctl::client::{SharedRegistry, new_shared_registry};
use gateway_ctl::config::GatewayConfig;
use gateway_ctl::error::FirewallError;
use gateway_ctl::gateway::{
    ArpResolver, AuthService, Firewall, FwAction, Gateway, GatewayStatus, PendingAuth,
    RetryScheduler, Verdict,
};
use gateway_ctl::{ControlContext, ControlServer};

#[derive(Debug, Clone, PartialEq)]
pub enum FwCall {
    Access(FwAction, Option<String>, String),
    Redirect(FwAction, String, String),
}

#[derive(Default)]
pub struct RecordingFirewall {
    calls: Mutex<Vec<FwCall>>,
}

impl RecordingFirewall {
    pub fn calls(&self) -> Vec<FwCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, mac: &str) -> Vec<FwCall> {
        self.calls()
            .into_iter()
            .filter(|c| match c {
                FwCall::Access(_, _, m) | FwCall::Redirect(_, _, m) => m == mac,
            })
            .collect()
    }
}

#[async_trait]
impl Firewall for RecordingFirewall {
    async fn access(
        &self,
        action: FwAction,
        ip: Option<&str>,
        mac: &str,
    ) -> Result<(), FirewallError> {
        self.calls
            .lock()
            .unwrap()
            .push(FwCall::Access(action, ip.map(str::to_string), mac.to_string()));
        Ok(())
    }

    async fn redirect(&self, action: FwAction, ip: &str, mac: &str) -> Result<(), FirewallError> {
        self.calls
            .lock()
            .unwrap()
            .push(FwCall::Redirect(action, ip.to_string(), mac.to_string()));
        Ok(())
    }
}

/// Answers per MAC; a queue of verdicts is consumed one per request, the
/// last one sticking.
#[derive(Default)]
pub struct ScriptedAuth {
    verdicts: Mutex<HashMap<String, VecDeque<Verdict>>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedAuth {
    pub fn set(&self, mac: &str, verdicts: &[Verdict]) {
        self.verdicts
            .lock()
            .unwrap()
            .insert(mac.to_string(), verdicts.iter().copied().collect());
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl AuthService for ScriptedAuth {
    fn request(&self, ip: &str, mac: &str) -> Verdict {
        self.requests
            .lock()
            .unwrap()
            .push((ip.to_string(), mac.to_string()));

        let mut verdicts = self.verdicts.lock().unwrap();
        match verdicts.get_mut(mac) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Verdict::Pending),
            Some(queue) => queue.front().copied().unwrap_or(Verdict::Pending),
            None => Verdict::Pending,
        }
    }
}

#[derive(Default)]
pub struct FakeArp {
    entries: Mutex<HashMap<String, String>>,
}

impl FakeArp {
    pub fn insert(&self, mac: &str, ip: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(mac.to_string(), ip.to_string());
    }
}

impl ArpResolver for FakeArp {
    fn ip_for_mac(&self, mac: &str) -> Option<String> {
        self.entries.lock().unwrap().get(mac).cloned()
    }
}

#[derive(Default)]
pub struct RecordingRetry {
    scheduled: Mutex<Vec<PendingAuth>>,
}

impl RecordingRetry {
    pub fn scheduled(&self) -> Vec<PendingAuth> {
        self.scheduled.lock().unwrap().clone()
    }
}

impl RetryScheduler for RecordingRetry {
    fn schedule(&self, pending: PendingAuth) {
        self.scheduled.lock().unwrap().push(pending);
    }
}

pub struct Harness {
    pub ctx: Arc<ControlContext>,
    pub registry: SharedRegistry,
    pub firewall: Arc<RecordingFirewall>,
    pub auth: Arc<ScriptedAuth>,
    pub arp: Arc<FakeArp>,
    pub retry: Arc<RecordingRetry>,
    pub dir: TempDir,
}

impl Harness {
    pub fn control_socket(&self) -> PathBuf {
        PathBuf::from(&self.ctx.config.control_socket)
    }

    pub fn internal_socket(&self) -> String {
        self.ctx.config.internal_socket.clone()
    }

    pub async fn client_macs(&self) -> Vec<String> {
        let registry = self.registry.lock().await;
        registry.iter().map(|c| c.mac().to_string()).collect()
    }
}

pub fn test_config(dir: &Path) -> GatewayConfig {
    GatewayConfig {
        control_socket: dir.join("ctl.sock").to_string_lossy().into_owned(),
        internal_socket: dir.join("internal.sock").to_string_lossy().into_owned(),
        gateway_address: "172.30.22.1".to_string(),
        ..GatewayConfig::default()
    }
}

/// Builds a harness whose scheduler only records pending requests.
pub fn harness() -> Harness {
    let retry = Arc::new(RecordingRetry::default());
    harness_with(test_config, retry.clone(), retry)
}

/// Builds a harness with a custom retry scheduler and config tweak.
pub fn harness_with(
    configure: impl FnOnce(&Path) -> GatewayConfig,
    scheduler: Arc<dyn RetryScheduler>,
    retry: Arc<RecordingRetry>,
) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = Arc::new(configure(dir.path()));
    let registry = new_shared_registry();
    let firewall = Arc::new(RecordingFirewall::default());
    let auth = Arc::new(ScriptedAuth::default());
    let arp = Arc::new(FakeArp::default());

    let gateway = Gateway {
        firewall: firewall.clone(),
        auth: auth.clone(),
        arp: arp.clone(),
        retry: scheduler,
        status: Arc::new(GatewayStatus::new(None)),
    };

    let ctx = Arc::new(ControlContext::new(
        registry.clone(),
        gateway,
        config,
        vec!["gateway-ctl".into()],
    ));

    Harness {
        ctx,
        registry,
        firewall,
        auth,
        arp,
        retry,
        dir,
    }
}

/// Binds the control socket and serves it in the background.
pub fn start_server(harness: &Harness) -> PathBuf {
    let server = ControlServer::bind(Arc::clone(&harness.ctx)).unwrap();
    tokio::spawn(async move { server.start().await });
    harness.control_socket()
}

/// Sends raw request bytes and collects everything until the server closes.
pub async fn send(path: &Path, request: &[u8]) -> Vec<u8> {
    let mut stream = UnixStream::connect(path).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut reply = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut reply))
        .await
        .expect("server did not close the connection")
        .unwrap();
    reply
}
