use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{Catalog, LeaderboardRecord, ScoreTier};
use quiz_core::time::fixed_now;
use services::{
    Clock, Frontend, LeaderboardService, QuizDriver, QuizPhase, QuizService, Shuffler,
};
use storage::repository::{InMemoryRepository, LeaderboardRepository, StorageError};

/// Frontend that replays scripted input and records everything shown.
#[derive(Default)]
struct ScriptedFrontend {
    names: VecDeque<String>,
    starts: VecDeque<bool>,
    resets: VecDeque<bool>,
    checks: VecDeque<bool>,
    answer_correctly: bool,
    prompted: Vec<String>,
    verdicts: Vec<(String, bool)>,
    summaries: Vec<(u32, u32, ScoreTier)>,
    boards: Vec<Vec<LeaderboardRecord>>,
    errors: Vec<String>,
}

impl Frontend for ScriptedFrontend {
    fn prompt_name(&mut self) -> Option<String> {
        self.names.pop_front()
    }

    fn prompt_start(&mut self) -> bool {
        self.starts.pop_front().unwrap_or(false)
    }

    fn prompt_reset(&mut self) -> bool {
        self.resets.pop_front().unwrap_or(false)
    }

    fn prompt_answer(&mut self, name: &str, options: &[String], default: &str) -> String {
        assert_eq!(options.len(), 8);
        self.prompted.push(name.to_owned());
        if self.answer_correctly {
            Catalog::default()
                .describe(name)
                .map(str::to_owned)
                .unwrap_or_default()
        } else {
            default.to_owned()
        }
    }

    fn prompt_check(&mut self) -> bool {
        self.checks.pop_front().unwrap_or(false)
    }

    fn show_verdict(&mut self, name: &str, is_correct: bool, _correct: &str, _chosen: &str) {
        self.verdicts.push((name.to_owned(), is_correct));
    }

    fn show_summary(&mut self, correct_count: u32, total: u32, tier: ScoreTier) {
        self.summaries.push((correct_count, total, tier));
    }

    fn show_leaderboard(&mut self, records: &[LeaderboardRecord], _total: u32) {
        self.boards.push(records.to_vec());
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_owned());
    }
}

fn driver(
    repo: Arc<dyn LeaderboardRepository>,
    frontend: ScriptedFrontend,
) -> QuizDriver<ScriptedFrontend> {
    let quiz = QuizService::new(Clock::fixed(fixed_now()), Arc::default(), repo.clone());
    QuizDriver::new(
        quiz,
        LeaderboardService::new(repo),
        Shuffler::seeded(17),
        frontend,
    )
}

#[tokio::test]
async fn blank_name_reprompts_then_quiz_is_scored_once() {
    let repo = Arc::new(InMemoryRepository::new());
    let frontend = ScriptedFrontend {
        names: VecDeque::from(["".to_owned(), "Ada".to_owned()]),
        starts: VecDeque::from([true, true]),
        resets: VecDeque::from([false, false]),
        checks: VecDeque::from([true, true, false]),
        answer_correctly: true,
        ..ScriptedFrontend::default()
    };

    let mut driver = driver(repo.clone(), frontend);
    driver.run().await.unwrap();

    assert_eq!(driver.session().phase(), QuizPhase::Scored);
    let frontend = driver.into_frontend();
    assert_eq!(frontend.errors.len(), 1);
    assert!(frontend.errors[0].contains("name"));
    assert_eq!(frontend.summaries.len(), 2);
    assert_eq!(frontend.summaries[0], (8, 8, ScoreTier::Perfect));
    assert_eq!(frontend.verdicts.len(), 16);

    // Every render of the form used the same item order.
    let renders: Vec<&[String]> = frontend.prompted.chunks(8).collect();
    assert_eq!(renders.len(), 3);
    assert!(renders.windows(2).all(|w| w[0] == w[1]));

    let stored = repo.top(None).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_name, "Ada");
    assert!(frontend.boards.iter().any(|b| b.len() == 1));
}

#[tokio::test]
async fn closed_input_ends_the_run() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut driver = driver(repo, ScriptedFrontend::default());
    driver.run().await.unwrap();

    assert_eq!(driver.session().phase(), QuizPhase::NotStarted);
    let frontend = driver.into_frontend();
    assert_eq!(frontend.boards, vec![Vec::<LeaderboardRecord>::new()]);
}

#[tokio::test]
async fn unreachable_leaderboard_degrades_to_a_notice() {
    struct DownRepository;

    #[async_trait]
    impl LeaderboardRepository for DownRepository {
        async fn append(&self, _record: &LeaderboardRecord) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("no route to host".into()))
        }

        async fn top(
            &self,
            _limit: Option<u32>,
        ) -> Result<Vec<LeaderboardRecord>, StorageError> {
            Err(StorageError::Unavailable("no route to host".into()))
        }
    }

    let frontend = ScriptedFrontend {
        names: VecDeque::from(["Ada".to_owned()]),
        starts: VecDeque::from([true]),
        checks: VecDeque::from([true]),
        ..ScriptedFrontend::default()
    };
    let mut driver = driver(Arc::new(DownRepository), frontend);
    driver.run().await.unwrap();

    let frontend = driver.into_frontend();
    assert_eq!(frontend.summaries, vec![(0, 8, ScoreTier::NeedsPractice)]);
    assert!(frontend.boards.is_empty());
    assert!(
        frontend
            .errors
            .iter()
            .any(|e| e.starts_with("Leaderboard unavailable"))
    );
    assert!(
        frontend
            .errors
            .iter()
            .any(|e| e.contains("could not be saved"))
    );
}

#[tokio::test]
async fn reset_returns_to_name_prompt() {
    let repo = Arc::new(InMemoryRepository::new());
    let frontend = ScriptedFrontend {
        names: VecDeque::from(["Ada".to_owned()]),
        starts: VecDeque::from([true]),
        resets: VecDeque::from([true]),
        ..ScriptedFrontend::default()
    };
    let mut driver = driver(repo.clone(), frontend);
    driver.run().await.unwrap();

    assert_eq!(driver.session().phase(), QuizPhase::NotStarted);
    assert!(repo.top(None).await.unwrap().is_empty());
}
