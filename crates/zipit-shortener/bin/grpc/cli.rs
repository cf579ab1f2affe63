use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;
use zipit_storage::PoolConfig;
use zipit_telemetry::LogFormat;

pub const LISTEN_ADDR_ENV: &str = "ZIPIT_SHORTENER_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "ZIPIT_SHORTENER_STORAGE";
pub const MYSQL_DSN_ENV: &str = "ZIPIT_SHORTENER_MYSQL_DSN";
pub const MYSQL_MAX_CONNECTIONS_ENV: &str = "ZIPIT_SHORTENER_MYSQL_MAX_CONNECTIONS";
pub const MYSQL_MAX_LIFETIME_ENV: &str = "ZIPIT_SHORTENER_MYSQL_MAX_LIFETIME_SECS";
pub const MYSQL_ACQUIRE_TIMEOUT_ENV: &str = "ZIPIT_SHORTENER_MYSQL_ACQUIRE_TIMEOUT_SECS";
pub const MYSQL_INIT_SCHEMA_ENV: &str = "ZIPIT_SHORTENER_MYSQL_INIT_SCHEMA";
pub const LOG_FORMAT_ENV: &str = "ZIPIT_SHORTENER_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "ZIPIT_SHORTENER_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:50051";
pub const DEFAULT_MYSQL_MAX_CONNECTIONS: u32 = 25;
pub const DEFAULT_MYSQL_MAX_LIFETIME_SECS: u64 = 300;
pub const DEFAULT_MYSQL_ACQUIRE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "zipit-shortener")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(
        long,
        env = MYSQL_MAX_CONNECTIONS_ENV,
        default_value_t = DEFAULT_MYSQL_MAX_CONNECTIONS
    )]
    pub mysql_max_connections: u32,

    #[arg(
        long,
        env = MYSQL_MAX_LIFETIME_ENV,
        default_value_t = DEFAULT_MYSQL_MAX_LIFETIME_SECS
    )]
    pub mysql_max_lifetime_secs: u64,

    #[arg(
        long,
        env = MYSQL_ACQUIRE_TIMEOUT_ENV,
        default_value_t = DEFAULT_MYSQL_ACQUIRE_TIMEOUT_SECS
    )]
    pub mysql_acquire_timeout_secs: u64,

    /// Create the `urls` table on startup if it does not exist.
    #[arg(long, env = MYSQL_INIT_SCHEMA_ENV)]
    pub mysql_init_schema: bool,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::builder()
            .max_connections(self.mysql_max_connections)
            .max_lifetime(Duration::from_secs(self.mysql_max_lifetime_secs))
            .acquire_timeout(Duration::from_secs(self.mysql_acquire_timeout_secs))
            .build()
    }
}
