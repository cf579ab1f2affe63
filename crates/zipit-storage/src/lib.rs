//! Record store backends for the Zipit shortener.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::{MySqlRepository, PoolConfig};
pub use zipit_core::repository::{RecordId, UrlRecord, UrlRepository};
pub use zipit_core::{Context, StorageError};
