//! HTTP/JSON front door of the shortener.
//!
//! The gateway validates request shape, forwards to the shortener over gRPC
//! and maps the returned status back to an HTTP status with a stable JSON
//! error body.

pub mod app;
pub mod client;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use client::{GrpcShortenerClient, ShortenerClient};
pub use state::AppState;
