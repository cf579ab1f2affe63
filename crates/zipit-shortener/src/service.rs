use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;
use zipit_core::{Context, ShortCode, Shortener, ShortenerError, StorageError, UrlRepository};

/// How many lookup-then-create rounds a single `shorten` call may spend
/// losing uniqueness races before giving up.
const MAX_CREATE_ATTEMPTS: usize = 3;

/// The shortening engine.
///
/// `shorten` first looks the long URL up and reuses the existing record's
/// code; otherwise it creates a pending record, derives the code from the
/// new id and writes it back. A [`StorageError::Conflict`] on create means
/// another caller inserted the same URL first, so the lookup is retried and
/// the winner's record reused.
///
/// If the write-back fails the record stays pending. It is not rolled back:
/// its code is `encode(id)` and can be backfilled later. Such records are
/// logged at `warn`.
#[derive(Debug)]
pub struct ShortenerService<R> {
    repository: Arc<R>,
}

impl<R> Clone for ShortenerService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UrlRepository> ShortenerService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_arc(Arc::new(repository))
    }

    /// Creates a service sharing an already reference-counted repository.
    pub fn from_arc(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Accepts absolute `http`/`https` URLs with a non-empty host.
    ///
    /// The string itself is stored unmodified, so no normalisation happens
    /// here either.
    fn validate_url(long_url: &str) -> Result<(), ShortenerError> {
        if long_url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        if long_url.trim() != long_url {
            return Err(ShortenerError::InvalidUrl(
                "URL must not have surrounding whitespace".to_string(),
            ));
        }

        let parsed = Url::parse(long_url)
            .map_err(|e| ShortenerError::InvalidUrl(format!("{e}: {long_url}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                parsed.scheme()
            )));
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a host: {long_url}"
            )));
        }

        Ok(())
    }

    async fn create_with_code(
        &self,
        ctx: &Context,
        long_url: &str,
    ) -> Result<Option<ShortCode>, ShortenerError> {
        let id = match self.repository.create(ctx, long_url).await {
            Ok(id) => id,
            Err(err) if err.is_conflict() => return Ok(None),
            Err(err) => return Err(ShortenerError::DatabaseWrite(err)),
        };

        let code = ShortCode::from_id(id);
        if let Err(err) = self.repository.set_short_code(ctx, id, &code).await {
            warn!(
                id = %id,
                code = %code,
                error = %err,
                "record left pending, short code not written"
            );
            return Err(ShortenerError::DatabaseWrite(err));
        }

        info!(id = %id, code = %code, "created short code");
        Ok(Some(code))
    }
}

#[async_trait]
impl<R: UrlRepository> Shortener for ShortenerService<R> {
    #[instrument(skip(self, ctx))]
    async fn shorten(&self, ctx: &Context, long_url: &str) -> Result<ShortCode, ShortenerError> {
        Self::validate_url(long_url)?;

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let existing = self
                .repository
                .find_by_long_url(ctx, long_url)
                .await
                .map_err(ShortenerError::DatabaseRead)?;

            if let Some(id) = existing {
                debug!(id = %id, "long url already shortened");
                return Ok(ShortCode::from_id(id));
            }

            match self.create_with_code(ctx, long_url).await? {
                Some(code) => return Ok(code),
                None => debug!(attempt, "lost create race, looking up the winner"),
            }
        }

        Err(ShortenerError::DatabaseWrite(StorageError::Conflict(
            format!("long url still conflicting after {MAX_CREATE_ATTEMPTS} attempts"),
        )))
    }

    #[instrument(skip(self, ctx, code), fields(code = %code))]
    async fn resolve(&self, ctx: &Context, code: &ShortCode) -> Result<String, ShortenerError> {
        match self.repository.find_by_short_code(ctx, code).await {
            Ok(long_url) => Ok(long_url),
            Err(StorageError::NotFound(_)) => {
                debug!("short code not found");
                Err(ShortenerError::NotFound(code.to_string()))
            }
            Err(err) => Err(ShortenerError::DatabaseRead(err)),
        }
    }
}
