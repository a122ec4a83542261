//! Edgelink server launcher.
//!
//! Binds the coordination server on the given port and serves until the
//! process is stopped.

use clap::Parser;
use edgelink_server::{EdgeServer, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Coordination server for edge devices.
#[derive(Parser)]
#[command(name = "edgelink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TCP port to listen on
    #[arg(short, long)]
    port: u16,

    /// Consecutive failed login attempts before a session is blocked (1-6)
    #[arg(short, long, default_value_t = 3)]
    max_failed_logins: u32,

    /// Directory holding the registry, logs, and data files
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Credential file name within the data directory
    #[arg(short, long, default_value = edgelink_store::DEFAULT_CREDENTIALS_FILE)]
    credentials: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::new(SocketAddr::from(([0, 0, 0, 0], cli.port)))
        .with_max_failed_logins(cli.max_failed_logins)
        .with_data_dir(cli.data_dir)
        .with_credentials_file(cli.credentials);

    let server = EdgeServer::bind(config).await?;
    info!(addr = %server.local_addr()?, "edgelink server started");
    server.run().await?;

    Ok(())
}
