use anyhow::Context;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::sync::Arc;
use strimzi_mcp::config::ServerConfig;
use strimzi_mcp::observability::init_tracing;
use strimzi_mcp::tools::{self, ToolContext};
use strimzi_mcp::{stdio, McpServer};
use strimzi_resources::KubeStore;
use tracing::info;

async fn kube_client(config: &ServerConfig) -> anyhow::Result<Client> {
    let Some(context) = config.kube_context.clone() else {
        return Client::try_default()
            .await
            .context("Failed to load Kubernetes configuration");
    };

    let kubeconfig = Kubeconfig::read().context("Failed to read kubeconfig")?;
    let options = KubeConfigOptions {
        context: Some(context.clone()),
        ..Default::default()
    };
    let kube_config = Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .with_context(|| format!("Failed to load kubeconfig context '{}'", context))?;
    Client::try_from(kube_config).context("Failed to create Kubernetes client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_format);

    let client = kube_client(&config).await?;
    let store = Arc::new(KubeStore::new(client));
    let ctx = ToolContext::new(store, config.default_namespace.clone());
    let registry = tools::registry(&ctx)?;

    info!(
        namespace = %config.default_namespace,
        context = config.kube_context.as_deref().unwrap_or("default"),
        tools = registry.len(),
        "Starting Strimzi MCP server"
    );

    let server = McpServer::strimzi(registry);
    stdio::serve_stdio(&server).await?;
    Ok(())
}
