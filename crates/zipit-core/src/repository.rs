use crate::context::Context;
use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::fmt::Display;

/// Store-assigned identifier of a URL record. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored URL record.
///
/// A record is *pending* while `short_code` is `None` and *complete* once
/// the code has been written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: RecordId,
    /// The long URL, stored exactly as submitted.
    pub long_url: String,
    pub short_code: Option<ShortCode>,
}

impl UrlRecord {
    pub fn is_pending(&self) -> bool {
        self.short_code.is_none()
    }
}

/// Durable storage of URL records.
///
/// Implementations must enforce uniqueness of `long_url` and of
/// `short_code` themselves, including under concurrent writers: the
/// shortening engine relies on a [`StorageError::Conflict`] from
/// [`create`](UrlRepository::create) to detect a lost race.
///
/// Every operation honours the deadline and cancellation of its [`Context`].
///
/// [`StorageError::Conflict`]: crate::error::StorageError::Conflict
#[async_trait]
pub trait UrlRepository: Send + Sync + 'static {
    /// Inserts a pending record for `long_url` and returns its new id.
    async fn create(&self, ctx: &Context, long_url: &str) -> Result<RecordId>;

    /// Looks up a record by its exact long URL. Absence is `Ok(None)`.
    async fn find_by_long_url(&self, ctx: &Context, long_url: &str) -> Result<Option<RecordId>>;

    /// Writes the short code of record `id`.
    ///
    /// Returns `Err(NotFound)` if no record has that id.
    async fn set_short_code(&self, ctx: &Context, id: RecordId, code: &ShortCode) -> Result<()>;

    /// Returns the long URL carrying `code`, or `Err(NotFound)`.
    async fn find_by_short_code(&self, ctx: &Context, code: &ShortCode) -> Result<String>;
}
