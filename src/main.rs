//! Blockdoku session server (default binary).
//!
//! Serves line-delimited JSON games over TCP; see `blockdoku::adapter` for
//! the protocol. Configuration comes from `BLOCKDOKU_*` environment
//! variables, with command-line flags taking precedence.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use blockdoku::adapter::{run_server, ServerConfig};

/// Blockdoku JSON session server
#[derive(Debug, Parser)]
#[command(name = "blockdoku", version, about)]
struct Args {
    /// Bind address (overrides BLOCKDOKU_HOST)
    #[arg(long)]
    host: Option<String>,
    /// Port (overrides BLOCKDOKU_PORT; 0 picks a free port)
    #[arg(short, long)]
    port: Option<u16>,
    /// Longest accepted request line in bytes (overrides BLOCKDOKU_MAX_LINE)
    #[arg(long)]
    max_line: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    blockdoku::init_logging();
    let args = Args::parse();

    let mut config = ServerConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(max_line) = args.max_line.filter(|&n| n > 0) {
        config.max_line_bytes = max_line;
    }

    info!(host = %config.host, port = config.port, "starting");
    run_server(config, None).await
}
