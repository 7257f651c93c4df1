//! Metadata store trait and the SQLite implementation.

use crate::error::{MetadataResult, map_insert_error};
use crate::models::NumberRow;
use crate::repos::NumberRepo;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use syracuse_core::NumberKey;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: NumberRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;

    /// Backend name for logging/metrics.
    fn backend_name(&self) -> &'static str;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub async fn new(path: impl AsRef<Path>, busy_timeout_secs: u64) -> MetadataResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            // A single writer connection avoids "database is locked" under concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(path = %path.display(), "opened SQLite metadata store");
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[async_trait]
impl NumberRepo for SqliteStore {
    async fn number_exists(&self, key: NumberKey) -> MetadataResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM numbers WHERE number = ?)")
                .bind(key.as_i64())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn get_number(&self, key: NumberKey) -> MetadataResult<Option<NumberRow>> {
        let row = sqlx::query_as::<_, NumberRow>(
            "SELECT number, is_even, is_prime, is_perfect, created_at FROM numbers WHERE number = ?",
        )
        .bind(key.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_number_if_absent(&self, row: &NumberRow) -> MetadataResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO numbers (number, is_even, is_prime, is_perfect, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(number) DO NOTHING
            "#,
        )
        .bind(row.number)
        .bind(row.is_even)
        .bind(row.is_prime)
        .bind(row.is_perfect)
        .bind(row.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &format!("number {}", row.number)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_numbers(&self) -> MetadataResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM numbers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS numbers (
    number INTEGER PRIMARY KEY CHECK (number > 0),
    is_even INTEGER NOT NULL,
    is_prime INTEGER NOT NULL,
    is_perfect INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
"#;
