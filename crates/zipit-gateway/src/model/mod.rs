mod url;

pub use url::{ErrorResponse, HealthResponse, ResolveResponse, ShortenRequest, ShortenResponse};
