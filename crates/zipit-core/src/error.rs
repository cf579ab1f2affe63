use thiserror::Error;

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by a [`UrlRepository`](crate::repository::UrlRepository).
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("storage operation cancelled")]
    Cancelled,
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

impl StorageError {
    /// Returns `true` when the write lost against a uniqueness constraint.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict(_))
    }

    /// Returns `true` when the caller gave up before the store answered.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StorageError::Cancelled | StorageError::Timeout(_))
    }
}

/// Errors emitted by the shortening engine.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("database read failed: {0}")]
    DatabaseRead(#[source] StorageError),
    #[error("database write failed: {0}")]
    DatabaseWrite(#[source] StorageError),
}

/// Errors from decoding a base62 string back into an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("decoded value does not fit in 64 bits")]
    Overflow,
}

/// Errors from validating a short code received at a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortCodeError {
    #[error("short code is empty")]
    Empty,
    #[error("short code length must be at most {max}, got {len}")]
    TooLong { len: usize, max: usize },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
