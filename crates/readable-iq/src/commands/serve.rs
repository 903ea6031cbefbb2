//! Serve command: MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use crate::server::ReadabilityServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Run the MCP server until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(_args: ServeArgs, max_input_bytes: Option<usize>) -> anyhow::Result<()> {
    info!(?max_input_bytes, "starting MCP server on stdio");

    let service = ReadabilityServer::new(max_input_bytes)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    let reason = service
        .waiting()
        .await
        .context("MCP server stopped unexpectedly")?;

    info!(?reason, "MCP server stopped");
    Ok(())
}
