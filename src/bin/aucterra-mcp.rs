//! MCP server binary for aucterra-mcp.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ServiceConfig` and runs the stdio server. stdout carries the protocol;
//! logs go to stderr.

use anyhow::{Context, Result};
use aucterra_mcp::{BackendClient, McpServer, ServiceConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "aucterra-mcp",
    version,
    about = "MCP server for Aucterra document extraction and classification"
)]
struct Cli {
    /// Backend base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Backend API key. Prefer the environment variable over the flag so
    /// the key stays out of shell history.
    #[arg(long, env = "AUCTERRA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-backend-call timeout in seconds.
    #[arg(long, default_value_t = 60)]
    request_timeout: u64,

    /// Timeout for fetching URL inputs in seconds.
    #[arg(long, default_value_t = 120)]
    download_timeout: u64,

    /// Cap on file and download sizes in bytes.
    #[arg(long, default_value_t = 20 * 1024 * 1024)]
    max_input_bytes: usize,

    /// Log filter, e.g. "info" or "aucterra_mcp=debug".
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout is the protocol channel; logs must stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut builder = ServiceConfig::builder()
        .request_timeout_secs(cli.request_timeout)
        .download_timeout_secs(cli.download_timeout)
        .max_input_bytes(cli.max_input_bytes);
    if let Some(base_url) = cli.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(api_key) = cli.api_key {
        builder = builder.api_key(api_key);
    }
    let config = builder.build().context("invalid configuration")?;

    let client = BackendClient::new(config).context("failed to build backend client")?;
    McpServer::new(client)
        .run_stdio()
        .await
        .context("server terminated abnormally")?;

    Ok(())
}
