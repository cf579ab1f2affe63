use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::{debug, info};
use typed_builder::TypedBuilder;
use zipit_core::error::{Result, StorageError};
use zipit_core::repository::{RecordId, UrlRepository};
use zipit_core::{Context, ShortCode};

/// Schema of the `urls` table, safe to run repeatedly.
pub const SCHEMA: &str = include_str!("../ddl/mysql/urls.sql");

/// Connection pool settings for [`MySqlRepository::connect_with`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct PoolConfig {
    #[builder(default = 25)]
    pub max_connections: u32,
    #[builder(default = Duration::from_secs(300))]
    pub max_lifetime: Duration,
    #[builder(default = Duration::from_secs(5))]
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// MySQL implementation of the record store contract.
///
/// Uniqueness of `long_url` is enforced through a stored SHA-256 column
/// (`TEXT` cannot carry a full-length unique index); lookups compare both
/// the hash and the string, so matching stays byte-exact. `short_code` is
/// nullable until the second write phase and unique once set.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool with
    /// default pool settings.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, PoolConfig::default()).await
    }

    /// Opens a pool with the given settings and checks the server answers.
    pub async fn connect_with(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .max_lifetime(config.max_lifetime)
            .acquire_timeout(config.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.ping().await?;
        info!(
            max_connections = config.max_connections,
            "mysql connection pool established"
        );
        Ok(repository)
    }

    /// Creates the `urls` table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Round trip to the server, for health checks.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    if is_unique_violation(&err) {
        return StorageError::Conflict(message);
    }

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StorageError::InvalidData(message),
        sqlx::Error::RowNotFound => StorageError::NotFound(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl UrlRepository for MySqlRepository {
    async fn create(&self, ctx: &Context, long_url: &str) -> Result<RecordId> {
        let result = ctx
            .run(async {
                sqlx::query(
                    r#"
                    INSERT INTO urls (long_url)
                    VALUES (?)
                    "#,
                )
                .bind(long_url)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)
            })
            .await?;

        Ok(RecordId::new(result.last_insert_id()))
    }

    async fn find_by_long_url(&self, ctx: &Context, long_url: &str) -> Result<Option<RecordId>> {
        let row = ctx
            .run(async {
                sqlx::query(
                    r#"
                    SELECT id
                    FROM urls
                    WHERE long_url_hash = UNHEX(SHA2(?, 256))
                      AND long_url = ?
                    LIMIT 1
                    "#,
                )
                .bind(long_url)
                .bind(long_url)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)
            })
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
        Ok(Some(RecordId::new(id)))
    }

    async fn set_short_code(&self, ctx: &Context, id: RecordId, code: &ShortCode) -> Result<()> {
        let result = ctx
            .run(async {
                sqlx::query(
                    r#"
                    UPDATE urls
                    SET short_code = ?
                    WHERE id = ?
                    "#,
                )
                .bind(code.as_str())
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)
            })
            .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Zero changed rows: either the id is unknown or the row already
        // carries this exact code.
        let current: Option<Option<String>> = ctx
            .run(async {
                sqlx::query_scalar::<_, Option<String>>(
                    r#"
                    SELECT short_code
                    FROM urls
                    WHERE id = ?
                    "#,
                )
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)
            })
            .await?;

        match current {
            None => Err(StorageError::NotFound(format!("no record with id {id}"))),
            Some(Some(existing)) if existing == code.as_str() => {
                debug!(id = %id, code = %code, "short code already assigned");
                Ok(())
            }
            Some(_) => Err(StorageError::Query(format!(
                "short code update for id {id} changed no rows"
            ))),
        }
    }

    async fn find_by_short_code(&self, ctx: &Context, code: &ShortCode) -> Result<String> {
        let row = ctx
            .run(async {
                sqlx::query(
                    r#"
                    SELECT long_url
                    FROM urls
                    WHERE short_code = ?
                    LIMIT 1
                    "#,
                )
                .bind(code.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)
            })
            .await?;

        let Some(row) = row else {
            return Err(StorageError::NotFound(format!("short code {code}")));
        };

        row.try_get("long_url").map_err(map_sqlx_error)
    }
}
