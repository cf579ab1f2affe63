//! Core types and traits for the Zipit URL shortener.
//!
//! This crate provides the base62 encoder, the short code boundary type,
//! the record store contract and the shortener contract shared by the
//! shortener service, the storage backends and the gateway.

pub mod base62;
pub mod context;
pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;
pub mod shutdown;

pub use context::Context;
pub use error::{DecodeError, ShortCodeError, ShortenerError, StorageError};
pub use repository::{RecordId, UrlRecord, UrlRepository};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
pub use shutdown::ShutdownSignal;
