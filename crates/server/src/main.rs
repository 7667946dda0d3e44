use std::sync::Arc;

use anyhow::Context as _;
use server::{BoardToolServer, logging};
use tools::{ApiClient, ToolRegistry, TracingObserver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;

    let config = config::load().context("invalid client configuration")?;

    let config_path = config::config_path();
    if !config_path.exists() {
        // Seed a file users can edit; the running process keeps its env overrides.
        if let Err(err) = config::save_config_to_file(&config::ClientConfig::default(), &config_path) {
            tracing::warn!("Failed to write default config to {}: {}", config_path.display(), err);
        }
    }

    let mut registry = ToolRegistry::with_backend_tools(ApiClient::from_config(&config));
    registry.observe(Arc::new(TracingObserver));

    let tool_names = registry.names().collect::<Vec<_>>().join(",");
    tracing::info!(
        api_url = %config.api_url,
        timeout_secs = config.request_timeout_secs,
        tools = %tool_names,
        "Starting board tools MCP server"
    );

    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(BoardToolServer::new(registry), transport).await?;
    service.waiting().await?;

    Ok(())
}
