mod cli;

use crate::cli::{StorageBackendArg, CLI};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tonic::transport::Server;
use tonic_health::server::HealthReporter;
use tracing::{info, warn};
use zipit_proto_schema::v1::shortener_service_server::ShortenerServiceServer;
use zipit_core::ShutdownSignal;
use zipit_shortener::{ShortenerGrpcServer, ShortenerService};
use zipit_storage::{InMemoryRepository, MySqlRepository, UrlRepository};

const HEALTH_PROBE_INTERVAL: Duration = Duration::from_secs(10);

type MySqlShortenerServer = ShortenerServiceServer<ShortenerGrpcServer<ShortenerService<MySqlRepository>>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    let _telemetry = zipit_telemetry::init(
        "zipit-shortener",
        config.log_format,
        config.otlp_endpoint.as_deref(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        "starting shortener gRPC server"
    );

    let shutdown = ShutdownSignal::install()?;

    match config.storage {
        StorageBackendArg::InMemory => {
            warn!("in-memory storage selected, records are lost on restart");
            run_server(config.listen_addr, InMemoryRepository::new(), None, shutdown).await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .ok_or("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect_with(mysql_dsn, config.pool_config()).await?;
            if config.mysql_init_schema {
                repository.init_schema().await?;
                info!("mysql schema initialized");
            }
            let probe = repository.clone();
            run_server(config.listen_addr, repository, Some(probe), shutdown).await?;
        }
    }

    info!("shortener gRPC server stopped");
    Ok(())
}

async fn run_server<R: UrlRepository>(
    listen_addr: SocketAddr,
    repository: R,
    mysql_probe: Option<MySqlRepository>,
    shutdown: ShutdownSignal,
) -> Result<(), tonic::transport::Error> {
    let service = ShortenerGrpcServer::new(ShortenerService::new(repository));

    let (reporter, health_service) = tonic_health::server::health_reporter();
    reporter
        .set_serving::<ShortenerServiceServer<ShortenerGrpcServer<ShortenerService<R>>>>()
        .await;
    if let Some(mysql) = mysql_probe {
        tokio::spawn(probe_mysql(reporter, mysql));
    }

    Server::builder()
        .add_service(health_service)
        .add_service(ShortenerServiceServer::new(service))
        .serve_with_shutdown(listen_addr, shutdown_signal(shutdown))
        .await
}

/// Flips the health status with database reachability.
async fn probe_mysql(reporter: HealthReporter, repository: MySqlRepository) {
    let mut interval = tokio::time::interval(HEALTH_PROBE_INTERVAL);
    let mut serving = true;

    loop {
        interval.tick().await;
        match repository.ping().await {
            Ok(()) if !serving => {
                info!("mysql reachable again, reporting serving");
                reporter.set_serving::<MySqlShortenerServer>().await;
                serving = true;
            }
            Err(e) if serving => {
                warn!(error = %e, "mysql unreachable, reporting not serving");
                reporter.set_not_serving::<MySqlShortenerServer>().await;
                serving = false;
            }
            _ => {}
        }
    }
}

async fn shutdown_signal(shutdown: ShutdownSignal) {
    shutdown.recv().await;
    info!("shutdown signal received");
}
