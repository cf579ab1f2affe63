use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tonic::{Code, Request, Response, Status};
use tracing::{error, instrument};
use zipit_core::{Context, ShortCode, Shortener, ShortenerError};
use zipit_proto_schema::v1 as proto;
use zipit_proto_schema::v1::shortener_service_server::ShortenerService as ShortenerRpc;
use zipit_proto_schema::v1::ConversionError;

/// Header carrying the caller's remaining deadline, as defined by the gRPC
/// wire protocol.
const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// Failures surfaced at the RPC boundary.
///
/// Every variant maps to a fixed status message; engine detail is logged
/// and never sent to the caller.
#[derive(Debug, Error)]
pub(crate) enum RpcError {
    #[error("url is required")]
    UrlRequired,
    #[error("alias is required")]
    AliasRequired,
    #[error("invalid alias: {0}")]
    InvalidAlias(String),
    #[error("shorten failed: {0}")]
    Shorten(#[source] ShortenerError),
    #[error("resolve failed: {0}")]
    Resolve(#[source] ShortenerError),
}

impl From<ConversionError> for RpcError {
    fn from(error: ConversionError) -> Self {
        match error {
            ConversionError::MissingField(_) => RpcError::AliasRequired,
            ConversionError::MalformedCode(source) => RpcError::InvalidAlias(source.to_string()),
        }
    }
}

impl From<RpcError> for Status {
    fn from(error: RpcError) -> Self {
        match error {
            RpcError::UrlRequired => Status::new(Code::InvalidArgument, "url is required"),
            RpcError::AliasRequired => Status::new(Code::InvalidArgument, "alias is required"),
            RpcError::InvalidAlias(_) => Status::new(Code::InvalidArgument, "invalid alias"),
            RpcError::Shorten(ShortenerError::InvalidUrl(_)) => {
                Status::new(Code::InvalidArgument, "invalid URL")
            }
            RpcError::Shorten(source) => {
                error!(error = %source, "shorten failed");
                Status::new(Code::Internal, "failed to shorten URL")
            }
            RpcError::Resolve(ShortenerError::NotFound(_)) => {
                Status::new(Code::NotFound, "url not found")
            }
            RpcError::Resolve(source) => {
                error!(error = %source, "resolve failed");
                Status::new(Code::Internal, "failed to fetch url")
            }
        }
    }
}

/// gRPC adapter over any [`Shortener`].
pub struct ShortenerGrpcServer<S> {
    shortener: Arc<S>,
}

impl<S> Clone for ShortenerGrpcServer<S> {
    fn clone(&self) -> Self {
        Self {
            shortener: Arc::clone(&self.shortener),
        }
    }
}

impl<S: Shortener> ShortenerGrpcServer<S> {
    pub fn new(shortener: S) -> Self {
        Self {
            shortener: Arc::new(shortener),
        }
    }

    pub fn from_arc(shortener: Arc<S>) -> Self {
        Self { shortener }
    }
}

/// Builds the per-call context, bounded by the caller's deadline if one was
/// sent.
fn request_context<T>(request: &Request<T>) -> Context {
    let timeout = request
        .metadata()
        .get(GRPC_TIMEOUT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_grpc_timeout);

    match timeout {
        Some(timeout) => Context::with_timeout(timeout),
        None => Context::background(),
    }
}

/// Parses a `grpc-timeout` value: up to eight ASCII digits followed by one
/// unit character (`H`, `M`, `S`, `m`, `u` or `n`).
pub(crate) fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if value.len() < 2 || !value.is_ascii() {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    let timeout = match unit {
        "H" => Duration::from_secs(amount * 60 * 60),
        "M" => Duration::from_secs(amount * 60),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };
    Some(timeout)
}

#[tonic::async_trait]
impl<S: Shortener> ShortenerRpc for ShortenerGrpcServer<S> {
    #[instrument(skip_all)]
    async fn shorten(
        &self,
        request: Request<proto::ShortenRequest>,
    ) -> Result<Response<proto::ShortenResponse>, Status> {
        let ctx = request_context(&request);
        let request = request.into_inner();
        let long_url = request
            .require_long_url()
            .map_err(|_| RpcError::UrlRequired)?;

        let code = self
            .shortener
            .shorten(&ctx, long_url)
            .await
            .map_err(RpcError::Shorten)?;

        Ok(Response::new(code.into()))
    }

    #[instrument(skip_all)]
    async fn resolve(
        &self,
        request: Request<proto::ResolveRequest>,
    ) -> Result<Response<proto::ResolveResponse>, Status> {
        let ctx = request_context(&request);
        let code = ShortCode::try_from(request.into_inner()).map_err(RpcError::from)?;

        let long_url = self
            .shortener
            .resolve(&ctx, &code)
            .await
            .map_err(RpcError::Resolve)?;

        Ok(Response::new(long_url.into()))
    }
}
