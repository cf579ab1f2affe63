use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::model::{ResolveResponse, ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tonic::Code;
use tracing::{error, instrument};
use zipit_core::ShortCode;

#[instrument(skip_all)]
pub async fn shorten_handler(
    State(state): State<AppState>,
    AppJson(request): AppJson<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    let long_url = request
        .long_url
        .filter(|long_url| !long_url.is_empty())
        .ok_or(AppError::LongUrlRequired)?;

    let short_code = state
        .shortener()
        .shorten(long_url)
        .await
        .map_err(|status| match status.code() {
            Code::InvalidArgument => AppError::InvalidUrl,
            code => {
                error!(?code, message = status.message(), "shorten rpc failed");
                AppError::ShortenFailed
            }
        })?;

    Ok((StatusCode::CREATED, Json(ShortenResponse { short_code })))
}

/// `GET /api/{code}`: the long URL as JSON.
#[instrument(skip(state))]
pub async fn resolve_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<ResolveResponse>> {
    let long_url = resolve(&state, &short_code).await?;
    Ok(Json(ResolveResponse { long_url }))
}

/// `GET /{code}`: a `302 Found` to the long URL.
#[instrument(skip(state))]
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Response> {
    let long_url = resolve(&state, &short_code).await?;
    let location = HeaderValue::try_from(long_url).map_err(|e| {
        error!(error = %e, "stored long url is not a valid header value");
        AppError::ResolveFailed
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// `GET /api/` with the code segment left out.
pub async fn missing_code_handler() -> AppError {
    AppError::ShortCodeRequired
}

fn parse_short_code(raw: &str) -> Result<ShortCode> {
    if raw.is_empty() {
        return Err(AppError::ShortCodeRequired);
    }
    ShortCode::parse(raw).map_err(|_| AppError::InvalidShortCode)
}

async fn resolve(state: &AppState, raw: &str) -> Result<String> {
    let code = parse_short_code(raw)?;

    state
        .shortener()
        .resolve(code.to_string())
        .await
        .map_err(|status| match status.code() {
            Code::NotFound => AppError::NotFound,
            code => {
                error!(?code, message = status.message(), "resolve rpc failed");
                AppError::ResolveFailed
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_code_validation() {
        assert_eq!(parse_short_code(""), Err(AppError::ShortCodeRequired));
        assert_eq!(parse_short_code("abc-1"), Err(AppError::InvalidShortCode));
        assert_eq!(parse_short_code("0123456789abc"), Err(AppError::InvalidShortCode));
        assert_eq!(parse_short_code("3d7").map(|code| code.to_string()), Ok("3d7".to_string()));
    }
}
