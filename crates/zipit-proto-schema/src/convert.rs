use thiserror::Error;
use zipit_core as core;

use crate::shortener::v1::{ResolveRequest, ResolveResponse, ShortenRequest, ShortenResponse};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("short code is malformed: {0}")]
    MalformedCode(#[from] core::ShortCodeError),
}

impl ShortenRequest {
    /// Returns the long URL, rejecting an empty field.
    ///
    /// Only presence is checked here; URL validation belongs to the engine.
    pub fn require_long_url(&self) -> Result<&str, ConversionError> {
        if self.long_url.is_empty() {
            return Err(ConversionError::MissingField("long_url"));
        }
        Ok(&self.long_url)
    }
}

impl TryFrom<&ResolveRequest> for core::ShortCode {
    type Error = ConversionError;

    fn try_from(request: &ResolveRequest) -> Result<Self, Self::Error> {
        if request.short_code.is_empty() {
            return Err(ConversionError::MissingField("short_code"));
        }
        Ok(core::ShortCode::parse(&request.short_code)?)
    }
}

impl TryFrom<ResolveRequest> for core::ShortCode {
    type Error = ConversionError;

    fn try_from(request: ResolveRequest) -> Result<Self, Self::Error> {
        (&request).try_into()
    }
}

impl From<core::ShortCode> for ShortenResponse {
    fn from(code: core::ShortCode) -> Self {
        Self {
            short_code: code.to_string(),
        }
    }
}

impl From<String> for ResolveResponse {
    fn from(long_url: String) -> Self {
        Self { long_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_request_into_short_code() {
        let request = ResolveRequest {
            short_code: "3d7".to_string(),
        };

        let code: core::ShortCode = request.try_into().expect("valid short code");
        assert_eq!(code.as_str(), "3d7");
    }

    #[test]
    fn empty_short_code_is_missing() {
        let request = ResolveRequest::default();

        let result: Result<core::ShortCode, _> = (&request).try_into();
        assert_eq!(result, Err(ConversionError::MissingField("short_code")));
    }

    #[test]
    fn malformed_short_code() {
        let request = ResolveRequest {
            short_code: "not/base62".to_string(),
        };

        let result: Result<core::ShortCode, _> = request.try_into();
        assert!(matches!(result, Err(ConversionError::MalformedCode(_))));
    }

    #[test]
    fn shorten_request_requires_long_url() {
        assert_eq!(
            ShortenRequest::default().require_long_url(),
            Err(ConversionError::MissingField("long_url"))
        );

        let request = ShortenRequest {
            long_url: "https://example.com".to_string(),
        };
        assert_eq!(request.require_long_url(), Ok("https://example.com"));
    }

    #[test]
    fn responses_from_core_values() {
        let code = core::ShortCode::from_id(core::RecordId::new(62));
        assert_eq!(ShortenResponse::from(code).short_code, "10");
        assert_eq!(
            ResolveResponse::from("https://example.com".to_string()).long_url,
            "https://example.com"
        );
    }
}
