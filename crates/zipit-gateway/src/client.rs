use async_trait::async_trait;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Status};
use zipit_proto_schema::v1 as proto;
use zipit_proto_schema::v1::shortener_service_client::ShortenerServiceClient;

/// The gateway's view of the shortener service.
///
/// Failures come back as the gRPC status the service answered with; the
/// handlers only look at its code.
#[async_trait]
pub trait ShortenerClient: Send + Sync + 'static {
    async fn shorten(&self, long_url: String) -> Result<String, Status>;

    async fn resolve(&self, short_code: String) -> Result<String, Status>;
}

/// [`ShortenerClient`] over a tonic channel.
///
/// Every call carries `timeout` as its gRPC deadline.
#[derive(Debug, Clone)]
pub struct GrpcShortenerClient {
    inner: ShortenerServiceClient<Channel>,
    timeout: Duration,
}

impl GrpcShortenerClient {
    pub fn new(channel: Channel, timeout: Duration) -> Self {
        Self {
            inner: ShortenerServiceClient::new(channel),
            timeout,
        }
    }

    /// Builds a client that connects on first use, so the gateway can start
    /// before the shortener is reachable.
    pub fn connect_lazy(endpoint: &str, timeout: Duration) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(endpoint.to_string())?
            .connect_timeout(timeout)
            .connect_lazy();
        Ok(Self::new(channel, timeout))
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request.set_timeout(self.timeout);
        request
    }
}

#[async_trait]
impl ShortenerClient for GrpcShortenerClient {
    async fn shorten(&self, long_url: String) -> Result<String, Status> {
        let request = self.request(proto::ShortenRequest { long_url });
        let response = self.inner.clone().shorten(request).await?;
        Ok(response.into_inner().short_code)
    }

    async fn resolve(&self, short_code: String) -> Result<String, Status> {
        let request = self.request(proto::ResolveRequest { short_code });
        let response = self.inner.clone().resolve(request).await?;
        Ok(response.into_inner().long_url)
    }
}
