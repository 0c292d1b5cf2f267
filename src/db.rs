use crate::{cache::LinkCache, error::StoreError, models::ShortLink};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::path::Path;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable code -> URL mapping backed by a SQLite file.
///
/// Built once at startup and handed to every request through `AppState`.
/// Cloning is cheap: clones share the connection pool and the cache.
#[derive(Clone, Debug)]
pub struct UrlStore {
    pool: SqlitePool,
    cache: LinkCache,
}

impl UrlStore {
    /// Open the store from a connection string such as `sqlite:./shortener.db`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = database_url.parse::<SqliteConnectOptions>()?;
        Self::connect_with(options).await
    }

    /// Open the store at a file path, creating the file if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::connect_with(SqliteConnectOptions::new().filename(path)).await
    }

    async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(
                options
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal),
            )
            .await?;

        // Embedded migrations (files in migrations/) create `urls` on first use
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            pool,
            cache: LinkCache::new(),
        })
    }

    /// Store `code -> url` unless either side is already present.
    ///
    /// Both columns carry UNIQUE constraints and the write is a single
    /// `INSERT OR IGNORE`, so repeated or concurrent calls for the same URL
    /// leave exactly one row and never overwrite it.
    pub async fn put(&self, code: &str, url: &str) -> Result<()> {
        let inserted =
            sqlx::query("INSERT OR IGNORE INTO urls (code, original_url) VALUES (?1, ?2)")
                .bind(code)
                .bind(url)
                .execute(&self.pool)
                .await?
                .rows_affected()
                > 0;

        if inserted {
            self.cache.set(code, url);
            tracing::debug!("Stored short code '{}'", code);
        } else {
            tracing::debug!("Short code '{}' or its URL already stored", code);
        }

        Ok(())
    }

    /// Exact-match lookup of a code. `None` means the code is unknown.
    pub async fn resolve(&self, code: &str) -> Result<Option<String>> {
        if let Some(url) = self.cache.get(code) {
            return Ok(Some(url));
        }

        let url: Option<String> =
            sqlx::query_scalar("SELECT original_url FROM urls WHERE code = ?1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        if let Some(url) = &url {
            self.cache.set(code, url);
        }

        Ok(url)
    }

    /// The row a URL was stored under, whatever code length was configured
    /// at the time.
    pub async fn find_by_url(&self, url: &str) -> Result<Option<ShortLink>> {
        let link = sqlx::query_as(
            "SELECT code, original_url, created_at FROM urls WHERE original_url = ?1",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
