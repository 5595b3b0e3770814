mod session;
mod workflow;

pub use session::{QuizPhase, QuizSession, SessionCheck};
pub use workflow::{CheckOutcome, QuizService, Submission};
