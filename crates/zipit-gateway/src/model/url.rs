use serde::{Deserialize, Serialize};

/// Body of `POST /api/shorten`.
///
/// Unknown fields are rejected. A missing or `null` `long_url` decodes to
/// `None` and is reported as a missing field rather than a malformed body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShortenRequest {
    #[serde(default)]
    pub long_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortenResponse {
    pub short_code: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolveResponse {
    pub long_url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
