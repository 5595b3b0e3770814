use async_trait::async_trait;
use quiz_core::model::{LeaderboardRecord, rank};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The backing store could not be reached, failed, or timed out.
    #[error("leaderboard store unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Append-only leaderboard contract.
///
/// Implementations must be safe to share between independent quiz sessions.
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Persist one completed attempt. Never deduplicates.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the record cannot be written.
    async fn append(&self, record: &LeaderboardRecord) -> Result<(), StorageError>;

    /// Records ordered by correct answers descending, then duration ascending.
    ///
    /// `None` returns every record. An empty store yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store cannot be read, or
    /// `StorageError::Serialization` if a stored row is malformed.
    async fn top(&self, limit: Option<u32>) -> Result<Vec<LeaderboardRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<Vec<LeaderboardRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardRepository for InMemoryRepository {
    async fn append(&self, record: &LeaderboardRecord) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    async fn top(&self, limit: Option<u32>) -> Result<Vec<LeaderboardRecord>, StorageError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .clone();
        rank(&mut records);
        if let Some(limit) = limit {
            records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(records)
    }
}

/// Holds the leaderboard repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub leaderboard: Arc<dyn LeaderboardRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            leaderboard: Arc::new(InMemoryRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::ElapsedSeconds;

    fn record(name: &str, correct: u32, centis: u64) -> LeaderboardRecord {
        LeaderboardRecord::new(name, correct, ElapsedSeconds::from_centis(centis))
    }

    #[tokio::test]
    async fn empty_store_returns_no_rows() {
        let repo = InMemoryRepository::new();
        assert!(repo.top(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn top_orders_and_limits() {
        let repo = InMemoryRepository::new();
        repo.append(&record("A", 5, 1000)).await.unwrap();
        repo.append(&record("B", 5, 850)).await.unwrap();
        repo.append(&record("C", 3, 100)).await.unwrap();

        let all = repo.top(None).await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.user_name.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);

        let first = repo.top(Some(1)).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].user_name, "B");
    }

    #[tokio::test]
    async fn append_keeps_duplicates() {
        let storage = Storage::in_memory();
        let r = record("A", 2, 500);
        storage.leaderboard.append(&r).await.unwrap();
        storage.leaderboard.append(&r).await.unwrap();
        assert_eq!(storage.leaderboard.top(None).await.unwrap().len(), 2);
    }
}
