//! URL shortening engine and its gRPC adapter.
//!
//! [`ShortenerService`] implements the dedup-or-create-then-encode protocol
//! over any [`UrlRepository`](zipit_core::UrlRepository). The [`grpc`]
//! module exposes it over the internal RPC boundary, translating engine
//! errors into gRPC status codes.

pub mod grpc;
pub mod service;

pub use grpc::ShortenerGrpcServer;
pub use service::ShortenerService;
pub use zipit_core::{Shortener, ShortenerError};
