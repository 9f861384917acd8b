mod auth;
mod bridge;
mod config;
mod sanitize;
mod server;
mod tools;

use anyhow::Context;
use auth::{CredentialResolver, CredentialSources};
use bridge::Bridge;
use clap::Parser;
use config::{Cli, Config};
use server::WayStationMcp;
use std::sync::Arc;
use tools::LocalTools;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the MCP protocol, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Config::from_cli(Cli::parse()).context("Failed to load configuration")?;
    tracing::info!(api_base = %config.api_base, config_dir = %config.config_dir.display(), "Starting WayStation MCP bridge");

    let resolver = CredentialResolver::new(CredentialSources {
        env_key: config.env_key.clone(),
        token_path: Some(config.token_path()),
        arg_key: config.arg_key.clone(),
    });
    if resolver.resolve().is_none() {
        tracing::warn!("No API key found yet; remote tool calls fail until WAY_KEY or the token file is set");
    }

    let handler = WayStationMcp {
        bridge: Arc::new(Bridge::new(config.api_base.clone())),
        resolver: Arc::new(resolver),
        local: Arc::new(LocalTools::new(config.config_dir.clone(), config.platform.clone())),
    };

    let service = rmcp::serve_server(handler, rmcp::transport::stdio())
        .await
        .context("Failed to start MCP server")?;
    tracing::info!("WayStation MCP bridge running on stdio");

    // Runs until the client closes stdin
    service.waiting().await?;

    Ok(())
}
