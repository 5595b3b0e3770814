use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use quiz_core::model::{Answers, Catalog, ElapsedSeconds, LeaderboardRecord, ScoreResult, score};

use crate::error::SessionError;
use crate::shuffle::Shuffler;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizPhase {
    #[default]
    NotStarted,
    InProgress,
    Scored,
}

impl QuizPhase {
    /// Answers can be recorded and checked.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::InProgress | Self::Scored)
    }
}

//
// ─── CHECK RESULT ──────────────────────────────────────────────────────────────
//

/// Result of checking answers: the score, plus the record to persist if the
/// session has not been submitted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCheck {
    pub score: ScoreResult,
    pub pending_record: Option<LeaderboardRecord>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One user's quiz attempt, from start to reset.
///
/// Presentation orderings are drawn once in [`QuizSession::start`] and returned
/// unchanged on every later access, so re-rendering never reshuffles.
#[derive(Debug, Clone)]
pub struct QuizSession {
    catalog: Arc<Catalog>,
    phase: QuizPhase,
    user_name: String,
    started_at: Option<DateTime<Utc>>,
    item_order: Vec<String>,
    description_order: Vec<String>,
    answers: Answers,
    last_score: Option<ScoreResult>,
    submitted: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            phase: QuizPhase::NotStarted,
            user_name: String::new(),
            started_at: None,
            item_order: Vec::new(),
            description_order: Vec::new(),
            answers: Answers::new(),
            last_score: None,
            submitted: false,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn item_order(&self) -> &[String] {
        &self.item_order
    }

    #[must_use]
    pub fn description_order(&self) -> &[String] {
        &self.description_order
    }

    #[must_use]
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    #[must_use]
    pub fn last_score(&self) -> Option<&ScoreResult> {
        self.last_score.as_ref()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Begin the quiz for `user_name`.
    ///
    /// `started_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is `NotStarted`,
    /// and `SessionError::EmptyUserName` if the name is blank.
    pub fn start(
        &mut self,
        user_name: &str,
        started_at: DateTime<Utc>,
        shuffler: &mut Shuffler,
    ) -> Result<(), SessionError> {
        if self.phase != QuizPhase::NotStarted {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                action: "start",
            });
        }

        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(SessionError::EmptyUserName);
        }

        self.user_name = user_name.to_owned();
        self.started_at = Some(started_at);
        self.item_order = shuffler.permute(self.catalog.names());
        self.description_order = shuffler.permute(self.catalog.descriptions());
        self.answers = Answers::new();
        self.last_score = None;
        self.submitted = false;
        self.phase = QuizPhase::InProgress;
        Ok(())
    }

    /// Discard everything and return to a fresh `NotStarted` session.
    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.catalog));
    }

    /// Replace the current selections. Does not change phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` before the quiz has started, and
    /// `SessionError::Catalog` if an answer names an item outside the catalog.
    pub fn record_answers(&mut self, answers: Answers) -> Result<(), SessionError> {
        self.require_active("record answers")?;
        for (name, _) in answers.iter() {
            self.catalog.describe(name)?;
        }
        self.answers = answers;
        Ok(())
    }

    /// Score the current selections and move to `Scored`.
    ///
    /// May be called repeatedly; the score is recomputed each time. A pending
    /// record is produced until [`QuizSession::mark_submitted`] is called.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` before the quiz has started.
    pub fn check(&mut self, checked_at: DateTime<Utc>) -> Result<SessionCheck, SessionError> {
        self.require_active("check answers")?;

        let result = score(&self.catalog, &self.answers);
        self.phase = QuizPhase::Scored;
        self.last_score = Some(result.clone());

        let pending_record = if self.submitted {
            None
        } else {
            let started_at = self.started_at.unwrap_or(checked_at);
            let elapsed = (checked_at - started_at).max(Duration::zero());
            Some(LeaderboardRecord::new(
                self.user_name.clone(),
                result.correct_count(),
                ElapsedSeconds::from_duration(elapsed)?,
            ))
        };

        Ok(SessionCheck {
            score: result,
            pending_record,
        })
    }

    /// Note that this session's record has been persisted.
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    fn require_active(&self, action: &'static str) -> Result<(), SessionError> {
        if self.phase.is_active() {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.phase,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn session() -> QuizSession {
        QuizSession::new(Arc::new(Catalog::default()))
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn start_shuffles_catalog_and_moves_to_in_progress() {
        let mut s = session();
        let mut shuffler = Shuffler::seeded(11);
        s.start("Ada", fixed_now(), &mut shuffler).unwrap();

        assert_eq!(s.phase(), QuizPhase::InProgress);
        assert_eq!(s.user_name(), "Ada");
        assert_eq!(s.started_at(), Some(fixed_now()));
        assert_eq!(
            sorted(s.item_order().to_vec()),
            sorted(s.catalog().names())
        );
        assert_eq!(
            sorted(s.description_order().to_vec()),
            sorted(s.catalog().descriptions())
        );
    }

    #[test]
    fn orderings_are_stable_across_accesses_and_checks() {
        let mut s = session();
        s.start("Ada", fixed_now(), &mut Shuffler::seeded(5)).unwrap();
        let items = s.item_order().to_vec();
        let descriptions = s.description_order().to_vec();

        s.record_answers(Answers::new().with("Modin", "Scale up pandas"))
            .unwrap();
        s.check(fixed_now()).unwrap();
        s.check(fixed_now()).unwrap();

        assert_eq!(s.item_order(), items.as_slice());
        assert_eq!(s.description_order(), descriptions.as_slice());
    }

    #[test]
    fn blank_name_is_rejected_and_session_stays_fresh() {
        let mut s = session();
        let err = s
            .start("   ", fixed_now(), &mut Shuffler::seeded(1))
            .unwrap_err();
        assert_eq!(err, SessionError::EmptyUserName);
        assert_eq!(s.phase(), QuizPhase::NotStarted);
        assert!(s.item_order().is_empty());
    }

    #[test]
    fn start_twice_is_an_invalid_transition() {
        let mut s = session();
        let mut shuffler = Shuffler::seeded(1);
        s.start("Ada", fixed_now(), &mut shuffler).unwrap();
        let err = s.start("Bob", fixed_now(), &mut shuffler).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                from: QuizPhase::InProgress,
                action: "start"
            }
        ));
        assert_eq!(s.user_name(), "Ada");
    }

    #[test]
    fn answers_and_check_require_a_started_quiz() {
        let mut s = session();
        assert!(matches!(
            s.record_answers(Answers::new()),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            s.check(fixed_now()),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn answers_for_unknown_items_are_rejected() {
        let mut s = session();
        s.start("Ada", fixed_now(), &mut Shuffler::seeded(1)).unwrap();
        let err = s
            .record_answers(Answers::new().with("Kafka", "Streams"))
            .unwrap_err();
        assert!(matches!(err, SessionError::Catalog(_)));
        assert_eq!(s.phase(), QuizPhase::InProgress);
    }

    #[test]
    fn check_builds_record_until_submitted() {
        let mut s = session();
        s.start("Ada", fixed_now(), &mut Shuffler::seeded(1)).unwrap();
        let answers: Answers = s
            .catalog()
            .entries()
            .iter()
            .map(|e| (e.name().to_owned(), e.description().to_owned()))
            .collect();
        s.record_answers(answers).unwrap();

        let later = fixed_now() + Duration::milliseconds(12_340);
        let first = s.check(later).unwrap();
        assert_eq!(s.phase(), QuizPhase::Scored);
        assert_eq!(first.score.correct_count(), 8);
        let record = first.pending_record.expect("first check yields a record");
        assert_eq!(record.user_name, "Ada");
        assert_eq!(record.correct_count, 8);
        assert_eq!(record.duration.to_string(), "12.34");

        // Not yet submitted: a retry still carries the record.
        assert!(s.check(later).unwrap().pending_record.is_some());

        s.mark_submitted();
        let again = s.check(later).unwrap();
        assert!(again.pending_record.is_none());
        assert_eq!(again.score, first.score);
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = session();
        s.start("Ada", fixed_now(), &mut Shuffler::seeded(1)).unwrap();
        s.check(fixed_now()).unwrap();
        s.mark_submitted();

        s.reset();
        assert_eq!(s.phase(), QuizPhase::NotStarted);
        assert!(!s.is_submitted());
        assert!(s.user_name().is_empty());
        assert!(s.last_score().is_none());

        s.start("Bob", fixed_now(), &mut Shuffler::seeded(2)).unwrap();
        assert_eq!(s.phase(), QuizPhase::InProgress);
        assert!(!s.is_submitted());
    }
}
