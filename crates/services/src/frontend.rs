use quiz_core::model::{Answers, LeaderboardRecord, ScoreTier};
use tracing::info;

use crate::error::{DriverError, SessionError};
use crate::leaderboard::{LeaderboardService, LeaderboardView};
use crate::quiz::{CheckOutcome, QuizPhase, QuizService, QuizSession, Submission};
use crate::shuffle::Shuffler;

/// Rendering collaborator the quiz is played through.
///
/// Implementations own all presentation; the driver only decides what to ask and
/// what to show.
pub trait Frontend {
    /// `None` when input is closed.
    fn prompt_name(&mut self) -> Option<String>;
    fn prompt_start(&mut self) -> bool;
    fn prompt_reset(&mut self) -> bool;
    /// Pick one of `options` for `name`; `""` means unanswered.
    fn prompt_answer(&mut self, name: &str, options: &[String], default: &str) -> String;
    fn prompt_check(&mut self) -> bool;
    fn show_verdict(&mut self, name: &str, is_correct: bool, correct: &str, chosen: &str);
    fn show_summary(&mut self, correct_count: u32, total: u32, tier: ScoreTier);
    /// An empty slice means the leaderboard has no entries yet.
    fn show_leaderboard(&mut self, records: &[LeaderboardRecord], total: u32);
    fn show_error(&mut self, message: &str);
}

/// Event loop that plays one quiz session at a time through a [`Frontend`].
pub struct QuizDriver<F: Frontend> {
    quiz: QuizService,
    leaderboard: LeaderboardService,
    shuffler: Shuffler,
    session: QuizSession,
    frontend: F,
}

impl<F: Frontend> QuizDriver<F> {
    #[must_use]
    pub fn new(
        quiz: QuizService,
        leaderboard: LeaderboardService,
        shuffler: Shuffler,
        frontend: F,
    ) -> Self {
        let session = quiz.new_session();
        Self {
            quiz,
            leaderboard,
            shuffler,
            session,
            frontend,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    #[must_use]
    pub fn into_frontend(self) -> F {
        self.frontend
    }

    /// Run until the user leaves.
    ///
    /// # Errors
    ///
    /// Returns `DriverError` only for state machine misuse; store failures are
    /// shown to the user and the loop continues.
    pub async fn run(&mut self) -> Result<(), DriverError> {
        while self.step().await? {}
        Ok(())
    }

    /// Handle one interaction. Returns `false` once the user leaves.
    ///
    /// # Errors
    ///
    /// See [`QuizDriver::run`].
    pub async fn step(&mut self) -> Result<bool, DriverError> {
        match self.session.phase() {
            QuizPhase::NotStarted => {
                self.render_leaderboard().await;
                let Some(name) = self.frontend.prompt_name() else {
                    return Ok(false);
                };
                if !self.frontend.prompt_start() {
                    return Ok(false);
                }
                match self.quiz.start(&mut self.session, &name, &mut self.shuffler) {
                    Ok(()) => {}
                    Err(SessionError::EmptyUserName) => {
                        self.frontend
                            .show_error("Please enter your name to start the quiz.");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            QuizPhase::InProgress | QuizPhase::Scored => {
                if self.frontend.prompt_reset() {
                    info!(user = self.session.user_name(), "quiz reset");
                    self.session.reset();
                    return Ok(true);
                }

                let answers = self.collect_answers();
                self.session.record_answers(answers)?;

                if !self.frontend.prompt_check() {
                    return Ok(false);
                }
                let outcome = self.quiz.check(&mut self.session).await?;
                self.render_outcome(&outcome);
                self.render_leaderboard().await;
            }
        }
        Ok(true)
    }

    fn collect_answers(&mut self) -> Answers {
        let mut answers = Answers::new();
        for name in self.session.item_order() {
            let default = self.session.answers().get(name);
            let choice =
                self.frontend
                    .prompt_answer(name, self.session.description_order(), default);
            answers.select(name.clone(), choice);
        }
        answers
    }

    fn render_outcome(&mut self, outcome: &CheckOutcome) {
        for verdict in outcome.score.per_item() {
            self.frontend.show_verdict(
                &verdict.name,
                verdict.is_correct,
                &verdict.correct,
                &verdict.chosen,
            );
        }
        self.frontend.show_summary(
            outcome.score.correct_count(),
            outcome.score.total(),
            outcome.score.tier(),
        );
        if let Submission::Failed { reason, .. } = &outcome.submission {
            self.frontend.show_error(&format!(
                "Your score could not be saved to the leaderboard: {reason}"
            ));
        }
    }

    async fn render_leaderboard(&mut self) {
        let total = u32::try_from(self.quiz.catalog().len()).unwrap_or(u32::MAX);
        match self.leaderboard.view().await {
            LeaderboardView::Ranked(records) => self.frontend.show_leaderboard(&records, total),
            LeaderboardView::Empty => self.frontend.show_leaderboard(&[], total),
            LeaderboardView::Unavailable(reason) => self
                .frontend
                .show_error(&format!("Leaderboard unavailable: {reason}")),
        }
    }
}
