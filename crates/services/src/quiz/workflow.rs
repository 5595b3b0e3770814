use std::sync::Arc;

use quiz_core::model::{Catalog, LeaderboardRecord, ScoreResult};
use storage::repository::LeaderboardRepository;
use tracing::{info, warn};

use super::session::QuizSession;
use crate::Clock;
use crate::error::SessionError;
use crate::shuffle::Shuffler;

/// What happened to the leaderboard write during a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// First successful check: the record was appended.
    Recorded(LeaderboardRecord),
    /// An earlier check already stored this session's record.
    AlreadyRecorded,
    /// The store rejected the write. The score is still valid and the next
    /// check retries the write.
    Failed {
        record: LeaderboardRecord,
        reason: String,
    },
}

/// Result of checking answers through the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub score: ScoreResult,
    pub submission: Submission,
}

/// Orchestrates quiz sessions against the leaderboard store.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    catalog: Arc<Catalog>,
    leaderboard: Arc<dyn LeaderboardRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<Catalog>,
        leaderboard: Arc<dyn LeaderboardRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            leaderboard,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutable access so tests can advance a fixed clock between transitions.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// A fresh `NotStarted` session over this service's catalog.
    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        QuizSession::new(Arc::clone(&self.catalog))
    }

    /// Start `session` for `user_name`, timed from the service clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyUserName` for a blank name and
    /// `SessionError::InvalidTransition` if the session already started.
    pub fn start(
        &self,
        session: &mut QuizSession,
        user_name: &str,
        shuffler: &mut Shuffler,
    ) -> Result<(), SessionError> {
        session.start(user_name, self.clock.now(), shuffler)?;
        info!(user = session.user_name(), "quiz started");
        Ok(())
    }

    /// Score the session and write its leaderboard record at most once.
    ///
    /// Store failures are reported through [`Submission::Failed`], never as an
    /// error, so the score can always be shown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the session has not started.
    pub async fn check(&self, session: &mut QuizSession) -> Result<CheckOutcome, SessionError> {
        let check = session.check(self.clock.now())?;

        let submission = match check.pending_record {
            None => Submission::AlreadyRecorded,
            Some(record) => match self.leaderboard.append(&record).await {
                Ok(()) => {
                    session.mark_submitted();
                    info!(
                        user = %record.user_name,
                        correct = record.correct_count,
                        duration = %record.duration,
                        "leaderboard record stored"
                    );
                    Submission::Recorded(record)
                }
                Err(e) => {
                    warn!(user = %record.user_name, error = %e, "leaderboard write failed");
                    Submission::Failed {
                        record,
                        reason: e.to_string(),
                    }
                }
            },
        };

        Ok(CheckOutcome {
            score: check.score,
            submission,
        })
    }
}
