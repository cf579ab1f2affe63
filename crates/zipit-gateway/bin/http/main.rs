mod cli;

use crate::cli::CLI;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use zipit_core::ShutdownSignal;
use zipit_gateway::{App, AppState, GrpcShortenerClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    let _telemetry = zipit_telemetry::init(
        "zipit-gateway",
        config.log_format,
        config.otlp_endpoint.as_deref(),
    )?;

    let client = GrpcShortenerClient::connect_lazy(&config.shortener_endpoint, config.rpc_timeout())?;
    let app = App::router(AppState::new(Arc::new(client)));

    let shutdown = ShutdownSignal::install()?;
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(
        listen_addr = %listener.local_addr()?,
        shortener_endpoint = %config.shortener_endpoint,
        rpc_timeout_ms = config.rpc_timeout_ms,
        "starting gateway server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: ShutdownSignal) {
    shutdown.recv().await;
    info!("shutdown signal received");
}
