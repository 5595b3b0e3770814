use std::sync::Arc;

use quiz_core::model::LeaderboardRecord;
use storage::repository::LeaderboardRepository;
use tracing::{debug, warn};

/// What the leaderboard panel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardView {
    Ranked(Vec<LeaderboardRecord>),
    Empty,
    /// The store could not be read; show a notice instead of rankings.
    Unavailable(String),
}

/// Read side of the leaderboard. Never fails: store errors degrade the view.
#[derive(Clone)]
pub struct LeaderboardService {
    leaderboard: Arc<dyn LeaderboardRepository>,
    limit: Option<u32>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(leaderboard: Arc<dyn LeaderboardRepository>) -> Self {
        Self {
            leaderboard,
            limit: None,
        }
    }

    /// Show at most `limit` rows; `None` shows all.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub async fn view(&self) -> LeaderboardView {
        match self.leaderboard.top(self.limit).await {
            Ok(records) if records.is_empty() => LeaderboardView::Empty,
            Ok(records) => {
                debug!(rows = records.len(), "leaderboard loaded");
                LeaderboardView::Ranked(records)
            }
            Err(e) => {
                warn!(error = %e, "leaderboard unavailable");
                LeaderboardView::Unavailable(e.to_string())
            }
        }
    }
}
