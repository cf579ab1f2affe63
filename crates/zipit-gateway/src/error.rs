use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

/// Every failure the gateway reports to its clients.
///
/// The display strings are the response messages and are part of the HTTP
/// contract. Internal detail never goes into them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    #[error("invalid JSON payload")]
    InvalidJson,
    #[error("long_url is required")]
    LongUrlRequired,
    #[error("invalid url")]
    InvalidUrl,
    #[error("failed to shorten url")]
    ShortenFailed,
    #[error("short code is required")]
    ShortCodeRequired,
    #[error("invalid short code format")]
    InvalidShortCode,
    #[error("short url not found")]
    NotFound,
    #[error("failed to resolve url")]
    ResolveFailed,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJson
            | AppError::LongUrlRequired
            | AppError::InvalidUrl
            | AppError::ShortCodeRequired
            | AppError::InvalidShortCode => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::ShortenFailed | AppError::ResolveFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(_: JsonRejection) -> Self {
        AppError::InvalidJson
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
