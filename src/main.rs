mod config;
mod constants;
mod core_auth;
mod core_cli;
mod core_ftpcommand;
mod core_network;
mod core_quota;
mod core_tls;
mod core_vfs;
mod server;
mod session;

use crate::config::Config;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::core_cli::Cli;
use crate::core_network::FtpServer;
use crate::server::ServerContext;
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info, warn};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Load configuration from the TOML file
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let config = Config::load_from_file(config_path)?;
    config.validate().context("Invalid configuration")?;
    info!("Loaded configuration from {}", config_path);

    let context = ServerContext::from_config(config)?;
    let server = FtpServer::new(context);
    let listener = server.bind().await?;

    let accept_loop = {
        let server = server.clone();
        tokio::spawn(async move { server.run(listener).await })
    };

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Shutting down: waiting for users to disconnect (press Ctrl-C again to force)");

    let graceful = server.stop(true);
    tokio::pin!(graceful);
    tokio::select! {
        _ = &mut graceful => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("Forcing shutdown");
            server.force_close();
            graceful.await;
        }
    }

    match accept_loop.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Server loop failed: {:#}", e),
        Err(e) => error!("Server task failed: {}", e),
    }
    info!("Server stopped");
    Ok(())
}
