#![forbid(unsafe_code)]

pub mod error;
pub mod frontend;
pub mod leaderboard;
pub mod quiz;
pub mod shuffle;

pub use quiz_core::Clock;

pub use error::{DriverError, SessionError};
pub use frontend::{Frontend, QuizDriver};
pub use leaderboard::{LeaderboardService, LeaderboardView};
pub use quiz::{CheckOutcome, QuizPhase, QuizService, QuizSession, SessionCheck, Submission};
pub use shuffle::{Shuffler, permute};
