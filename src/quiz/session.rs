use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};

use super::QuizRules;

/// Per-visitor quiz progress. Loaded from the session store at the start of a request,
/// mutated by the quiz flow and written back by the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSession {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub wrong_answers: i64,
    #[serde(default, deserialize_with = "deserialize_asked_questions")]
    pub asked_questions: Vec<i64>,
    /// Set once the last handed out question has been answered.
    #[serde(default)]
    pub answered: bool,
}

impl QuizSession {
    /// Parses a stored document. Anything unreadable falls back to a fresh session.
    pub fn from_stored(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|err| {
            tracing::warn!("Discarding unreadable session state: {err}");
            Self::default()
        })
    }

    pub fn init(&mut self, category_id: i64) {
        *self = Self {
            category_id: Some(category_id),
            ..Self::default()
        };
    }

    /// Starts over when the visitor switches to another category. Returns true on reset.
    pub fn ensure_category(&mut self, category_id: i64) -> bool {
        if self.category_id == Some(category_id) {
            return false;
        }
        self.init(category_id);
        true
    }

    pub fn is_active_for(&self, category_id: i64) -> bool {
        self.category_id == Some(category_id)
    }

    pub fn flush(&mut self) {
        *self = Self::default();
    }

    /// The question currently shown, i.e. the last one handed out, while it is
    /// still waiting for an answer.
    pub fn current_question(&self) -> Option<i64> {
        if self.answered {
            return None;
        }
        self.asked_questions.last().copied()
    }

    pub fn record_asked(&mut self, question_id: i64) {
        if !self.asked_questions.contains(&question_id) {
            self.asked_questions.push(question_id);
            self.answered = false;
        }
    }

    pub fn record_answer(&mut self, is_correct: bool) {
        self.answered = true;
        if is_correct {
            self.score += 1;
        } else {
            self.wrong_answers += 1;
        }
    }

    pub fn out_of_attempts(&self, rules: &QuizRules) -> bool {
        self.wrong_answers >= rules.max_wrong_answers
    }

    pub fn total_questions(&self) -> usize {
        self.asked_questions.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAskedQuestions {
    List(Vec<i64>),
    Single(i64),
    Other(serde_json::Value),
}

// older or tampered documents may hold a bare id or garbage instead of a list
fn deserialize_asked_questions<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let asked = match StoredAskedQuestions::deserialize(deserializer)? {
        StoredAskedQuestions::List(ids) => ids.into_iter().unique().collect(),
        StoredAskedQuestions::Single(id) => {
            tracing::warn!("Repairing asked_questions stored as a single id {id}");
            vec![id]
        }
        StoredAskedQuestions::Other(value) => {
            tracing::warn!("Resetting malformed asked_questions {value}");
            vec![]
        }
    };
    Ok(asked)
}
