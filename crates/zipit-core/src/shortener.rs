use crate::context::Context;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short code for `long_url`, creating a record on first
    /// sight and reusing the existing one afterwards.
    async fn shorten(&self, ctx: &Context, long_url: &str) -> Result<ShortCode>;

    /// Returns the long URL stored for `code`.
    async fn resolve(&self, ctx: &Context, code: &ShortCode) -> Result<String>;
}
