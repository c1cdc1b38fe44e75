use galleria_replicate::ReplicateAdapterBuilder;
use galleria_server::{build_app, config::ServerConfig, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    telemetry::init_tracing(config.log_json)?;

    let provider = ReplicateAdapterBuilder::new_from_env().build()?;
    let app = build_app(&config, provider)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, storage = ?config.storage, "galleria listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for ctrl-c");
    }
    info!("shutting down");
}
