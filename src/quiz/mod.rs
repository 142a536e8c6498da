mod error;
pub mod flow;
pub mod leaderboard;
pub mod recorder;
pub mod session;

pub use error::QuizError;
pub use flow::{EndReason, QuestionView, QuizStep};
pub use leaderboard::LeaderboardEntry;
pub use recorder::{ContactForm, Recorded};
pub use session::QuizSession;

/// Limits that drive quiz termination and result submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRules {
    pub max_wrong_answers: i64,
    pub resubmit_cooldown: chrono::Duration,
    pub leaderboard_size: usize,
}

impl Default for QuizRules {
    fn default() -> Self {
        Self {
            max_wrong_answers: 3,
            resubmit_cooldown: chrono::Duration::hours(1),
            leaderboard_size: 10,
        }
    }
}
