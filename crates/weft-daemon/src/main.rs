//! weft-daemon: the ledger emulator's data service.
//!
//! Single OS process running a Tokio async runtime. Clients submit chunks and
//! query the ledger via JSON-RPC over a Unix socket.

mod commands;
mod config;
mod rpc;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::DaemonConfig;
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// The single database connection, shared by every request.
    pub db: Arc<tokio::sync::Mutex<rusqlite::Connection>>,
    pub config: DaemonConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DaemonConfig::load()?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("weft={}", config.advanced.log_level)))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("weft daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let conn = weft_db::open(&config.db_path())?;
    let socket_path = config.socket_path();

    let state = Arc::new(DaemonState {
        db: Arc::new(tokio::sync::Mutex::new(conn)),
        config,
    });

    let rpc_server = RpcServer::new(state, socket_path.clone());

    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    let _ = std::fs::remove_file(&socket_path);

    info!("weft daemon stopped");
    Ok(())
}
