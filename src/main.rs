//! gateway-ctl - Entry Point
//!
//! Control plane daemon for a captive-portal gateway.

use clap::Parser;
use log::{info, warn};
use std::sync::Arc;

use gateway_ctl::client::new_shared_registry;
use gateway_ctl::config::{DEFAULT_CONFIG_FILE, GatewayConfig};
use gateway_ctl::error::GatewayCtlError;
use gateway_ctl::error::handlers::{exit_code, handle_error};
use gateway_ctl::gateway::{DelayedRetry, Gateway, run_retry_worker};
use gateway_ctl::restart::{adopt_clients, restart_args};
use gateway_ctl::utils::logging::setup_logging;
use gateway_ctl::utils::process::wait_for_exit;
use gateway_ctl::{ControlContext, ControlServer};

#[derive(Parser, Debug)]
#[command(name = "gateway-ctl", version, about = "Control plane for a captive-portal gateway")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// PID of the instance this one replaces (set by a live restart)
    #[arg(long, value_name = "PID", hide = true)]
    restarted_from: Option<i32>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging();

    info!("Launching gateway control plane...");

    if let Err(e) = run(cli).await {
        handle_error(&e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<(), GatewayCtlError> {
    let config = Arc::new(GatewayConfig::load(&cli.config)?);
    let registry = new_shared_registry();
    let (retry, retry_rx) = DelayedRetry::channel();
    let gateway = Gateway::from_config(&config, retry, cli.restarted_from);

    if let Some(pid) = cli.restarted_from {
        info!("Restarted from {}, collecting clients", pid);
        if let Err(e) = adopt_clients(&config.internal_socket, &registry, gateway.arp.as_ref()).await {
            warn!("Could not collect clients from previous instance: {}", e);
        }
        wait_for_exit(pid).await;
    }

    let argv = restart_args(std::env::args_os(), std::process::id() as i32);
    let context = Arc::new(ControlContext::new(registry, gateway, config, argv));
    let server = ControlServer::bind(Arc::clone(&context))?;

    tokio::spawn(run_retry_worker(retry_rx, Arc::clone(&context)));

    tokio::select! {
        _ = server.start() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received SIGINT, shutting down");
        }
    }

    Ok(())
}
