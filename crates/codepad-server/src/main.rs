//! HTTP server for the Codepad code assistant
//!
//! Serves the explain, improve and execute endpoints used by the browser
//! editor. Configuration comes from an optional YAML file; API keys come from
//! the environment and the server starts without them, failing only the
//! requests that need the missing service.

use anyhow::Result;
use clap::Parser;
use codepad_core::{config::ConfigLoader, CodepadHandler};
use codepad_http::{shutdown_signal, CodepadServer};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Codepad Server - explain, improve and run code snippets")]
struct Cli {
    #[clap(long, short, default_value = "codepad.yaml", help = "Path to the YAML configuration file (optional)")]
    config: String,

    #[clap(long, help = "Override the bind address from the configuration and PORT")]
    bind_addr: Option<String>,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    run_server(cli.config, cli.bind_addr).await
}

async fn run_server(config: String, bind_addr: Option<String>) -> Result<()> {
    log::info!("Loading configuration from: {}", config);
    let codepad_config = ConfigLoader::from_path_or_default(&config).await?;

    let handler = CodepadHandler::from_config(&codepad_config);

    let mut server_config = codepad_config.to_server_config()?.with_logging(true);
    if let Some(bind_addr) = bind_addr {
        server_config = server_config.with_bind_addr_str(&bind_addr)?;
    }

    log::info!("Starting Codepad server on {}...", server_config.bind_addr);

    let server = CodepadServer::with_config(handler, server_config);

    if let Err(e) = server.serve_with_shutdown(shutdown_signal()).await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }

    log::info!("Codepad server shut down gracefully.");
    Ok(())
}
