use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use zipit_telemetry::LogFormat;

pub const LISTEN_ADDR_ENV: &str = "ZIPIT_GATEWAY_LISTEN_ADDR";
pub const SHORTENER_ENDPOINT_ENV: &str = "ZIPIT_GATEWAY_SHORTENER_ENDPOINT";
pub const RPC_TIMEOUT_ENV: &str = "ZIPIT_GATEWAY_RPC_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "ZIPIT_GATEWAY_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "ZIPIT_GATEWAY_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SHORTENER_ENDPOINT: &str = "http://127.0.0.1:50051";
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Parser)]
#[command(name = "zipit-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(long, env = SHORTENER_ENDPOINT_ENV, default_value = DEFAULT_SHORTENER_ENDPOINT)]
    pub shortener_endpoint: String,

    /// Deadline attached to every call to the shortener.
    #[arg(long, env = RPC_TIMEOUT_ENV, default_value_t = DEFAULT_RPC_TIMEOUT_MS)]
    pub rpc_timeout_ms: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}
