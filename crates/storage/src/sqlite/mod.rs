use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;
use tracing::warn;

use crate::repository::{LeaderboardRepository, Storage, StorageError};

mod leaderboard_repo;
mod migrate;

/// Upper bound for a single store operation unless configured otherwise.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
    op_timeout: Duration,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL and the default operation timeout.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        Self::connect_with_timeout(database_url, DEFAULT_OP_TIMEOUT).await
    }

    /// Connect with an explicit bound on every store operation.
    ///
    /// The same bound is used for pool acquisition and for `SQLite`'s busy
    /// handler, so concurrent writers from other sessions wait at most that long.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or if
    /// configuring the connection fails.
    pub async fn connect_with_timeout(
        database_url: &str,
        op_timeout: Duration,
    ) -> Result<Self, SqliteInitError> {
        let busy_ms = i64::try_from(op_timeout.as_millis()).unwrap_or(i64::MAX);
        let mut options = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(op_timeout);
        // An in-memory database lives only as long as its last open connection.
        if is_in_memory(database_url) {
            options = options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = options
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    let busy = format!("PRAGMA busy_timeout = {busy_ms};");
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query(&busy).execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool, op_timeout })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[must_use]
    pub fn op_timeout(&self) -> Duration {
        self.op_timeout
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }

    /// Close the pool; later operations report `StorageError::Unavailable`.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Run `fut` under the operation timeout, mapping every failure to `Unavailable`.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(op, error = %e, "leaderboard store operation failed");
                Err(StorageError::Unavailable(e.to_string()))
            }
            Err(_) => {
                let ms = self.op_timeout.as_millis();
                warn!(op, timeout_ms = %ms, "leaderboard store operation timed out");
                Err(StorageError::Unavailable(format!(
                    "{op} timed out after {ms} ms"
                )))
            }
        }
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        Self::sqlite_with_timeout(database_url, DEFAULT_OP_TIMEOUT).await
    }

    /// Like [`Storage::sqlite`] with an explicit operation timeout.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite_with_timeout(
        database_url: &str,
        op_timeout: Duration,
    ) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect_with_timeout(database_url, op_timeout).await?;
        repo.migrate().await?;
        let leaderboard: Arc<dyn LeaderboardRepository> = Arc::new(repo);
        Ok(Self { leaderboard })
    }
}
