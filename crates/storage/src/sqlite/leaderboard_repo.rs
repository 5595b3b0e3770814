use quiz_core::model::{ElapsedSeconds, LeaderboardRecord};
use sqlx::Row;
use tracing::debug;

use super::SqliteRepository;
use crate::repository::{LeaderboardRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn map_record_row(row: &sqlx::sqlite::SqliteRow) -> Result<LeaderboardRecord, StorageError> {
    let user_name: String = row.try_get("user_name").map_err(ser)?;
    let correct: i64 = row.try_get("correct").map_err(ser)?;
    let correct_count = u32::try_from(correct)
        .map_err(|_| StorageError::Serialization(format!("invalid correct: {correct}")))?;
    let duration: String = row.try_get("duration").map_err(ser)?;
    let duration: ElapsedSeconds = duration.parse().map_err(ser)?;

    Ok(LeaderboardRecord::new(user_name, correct_count, duration))
}

#[async_trait::async_trait]
impl LeaderboardRepository for SqliteRepository {
    async fn append(&self, record: &LeaderboardRecord) -> Result<(), StorageError> {
        let duration = record.duration.to_string();
        let insert = sqlx::query(
            r"
                INSERT INTO leaderboard (user_name, correct, duration)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(&record.user_name)
        .bind(i64::from(record.correct_count))
        .bind(&duration)
        .execute(&self.pool);

        let res = self.bounded("append", insert).await?;
        debug!(row_id = res.last_insert_rowid(), "leaderboard record appended");
        Ok(())
    }

    async fn top(&self, limit: Option<u32>) -> Result<Vec<LeaderboardRecord>, StorageError> {
        // Durations are stored as text; compare them numerically so "10.00" ranks after "8.50".
        let select = sqlx::query(
            r"
                SELECT user_name, correct, duration
                FROM leaderboard
                ORDER BY correct DESC, CAST(duration AS REAL) ASC, id ASC
                LIMIT ?1
            ",
        )
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(&self.pool);

        let rows = self.bounded("top", select).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_record_row(&row)?);
        }
        debug!(rows = out.len(), "leaderboard queried");
        Ok(out)
    }
}
