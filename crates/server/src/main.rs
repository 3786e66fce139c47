//! `sandbox-mcp`: MCP stdio server exposing a remote sandbox HTTP API as
//! tools, either from the hand-declared sandbox table or derived from an
//! OpenAPI document at startup.

mod logging;
mod service;
mod tools;

use anyhow::Context as _;
use clap::Parser;
use rmcp::ServiceExt as _;
use sandbox_openapi_tools::config::AdapterConfig;
use sandbox_openapi_tools::runtime::ToolRegistry;
use service::SandboxService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "sandbox-mcp", version, about)]
struct Cli {
    /// OpenAPI document URL or file path. When given, tools are derived
    /// from the document instead of the built-in sandbox table.
    #[arg(long = "json-url", value_name = "URL")]
    json_url: Option<String>,

    /// Base URL of the sandbox API (static mode).
    #[arg(long, env = "API_BASE", default_value = "http://localhost:3000")]
    api_base: String,

    /// Static API key sent as `x-api-key` on every proxied call.
    #[arg(long, env = "API_KEY")]
    api_key: Option<String>,

    /// Per-call deadline in seconds. 0 disables the deadline.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let config = AdapterConfig {
        document: cli.json_url.clone(),
        api_key: cli.api_key.clone(),
        timeout_secs: cli.timeout_secs,
    };

    let registry = if config.document.is_some() {
        ToolRegistry::bootstrap_openapi(&config)
            .await
            .context("bootstrap from OpenAPI document")?
    } else {
        ToolRegistry::from_table(tools::sandbox_tools(), cli.api_base.clone(), &config)
    };
    tracing::info!("Serving {} tools over stdio", registry.tools().len());

    let cancel = CancellationToken::new();
    let handler = SandboxService::new(Arc::new(registry), cancel.clone());

    let server = handler
        .serve(rmcp::transport::stdio())
        .await
        .context("start stdio transport")?;

    tokio::select! {
        quit = server.waiting() => {
            quit.context("transport closed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
        }
    }
    // Abort any in-flight proxied calls before exiting.
    cancel.cancel();

    Ok(())
}
