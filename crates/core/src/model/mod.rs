mod answer;
mod catalog;
mod leaderboard;
mod score;

pub use answer::Answers;
pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use leaderboard::{ElapsedError, ElapsedSeconds, LeaderboardRecord, rank, ranking_order};
pub use score::{GOOD_SCORE_THRESHOLD, ItemVerdict, ScoreResult, ScoreTier, score};
