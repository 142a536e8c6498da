//! Quiz progression: picking unseen questions and moving a session between
//! "in progress" and "ended".

use sqlx::SqlitePool;

use crate::db::queries::{categories, choices, questions};
use crate::db::{Category, Choice, Question};
use crate::telemetry::{ANSWERS_CNTR, FINISHED_CNTR};

use super::{QuizError, QuizRules, QuizSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The category has no questions at all.
    Empty,
    /// Every question of the category has been asked.
    Exhausted,
    /// The wrong answer limit was reached.
    OutOfAttempts,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Empty => "empty",
            EndReason::Exhausted => "exhausted",
            EndReason::OutOfAttempts => "out_of_attempts",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub category: Category,
    pub question: Question,
    pub choices: Vec<Choice>,
    pub score: i64,
    pub wrong_answers: i64,
    pub previous_is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizStep {
    InProgress(QuestionView),
    Ended(EndReason),
}

/// Next unseen question of the category, uniformly at random. `None` once exhausted.
pub async fn next_question(
    pool: &SqlitePool,
    category_id: i64,
    excluded: &[i64],
) -> Result<Option<Question>, QuizError> {
    Ok(questions::get_random_question_excluding(pool, category_id, excluded).await?)
}

/// Entry point for `GET /quiz/{category_id}/`: starts or resumes the run and hands out a question.
pub async fn show_question(
    pool: &SqlitePool,
    session: &mut QuizSession,
    category_id: i64,
    rules: &QuizRules,
) -> Result<QuizStep, QuizError> {
    let category = categories::get_category(pool, category_id)
        .await
        .map_err(QuizError::not_found("category", category_id))?;

    let started = session.ensure_category(category_id);
    if started {
        tracing::info!("Starting quiz for category {}", category.name);
    }
    if session.out_of_attempts(rules) {
        return Ok(already_ended(&category, EndReason::OutOfAttempts));
    }
    if questions::count_questions_for_category(pool, category_id).await? == 0 {
        return Ok(if started {
            finish(&category, EndReason::Empty)
        } else {
            already_ended(&category, EndReason::Empty)
        });
    }

    advance(pool, session, category, None).await
}

/// Entry point for `POST /quiz/{category_id}/check_answer/`.
///
/// A missing choice leaves the counters alone and shows the current question again.
/// A choice for any question other than the one on screen is treated the same way,
/// which keeps double submits from scoring twice.
pub async fn check_answer(
    pool: &SqlitePool,
    session: &mut QuizSession,
    category_id: i64,
    choice_id: Option<i64>,
    rules: &QuizRules,
) -> Result<QuizStep, QuizError> {
    let choice = match choice_id {
        Some(id) => Some(
            choices::get_choice(pool, id)
                .await
                .map_err(QuizError::not_found("choice", id))?,
        ),
        None => None,
    };
    let category = categories::get_category(pool, category_id)
        .await
        .map_err(QuizError::not_found("category", category_id))?;

    if !session.is_active_for(category_id) {
        tracing::debug!("Answer for inactive category {category_id}, restarting");
        return show_question(pool, session, category_id, rules).await;
    }
    if session.out_of_attempts(rules) {
        return Ok(already_ended(&category, EndReason::OutOfAttempts));
    }

    let choice = match choice {
        Some(choice) if Some(choice.question_id) == session.current_question() => choice,
        _ => return redisplay(pool, session, category).await,
    };

    session.record_answer(choice.is_correct);
    ANSWERS_CNTR
        .with_label_values(&[category.name.as_str(), bool_label(choice.is_correct)])
        .inc();
    tracing::debug!(
        "Answer to question {} is {}, score {} wrong {}",
        choice.question_id,
        bool_label(choice.is_correct),
        session.score,
        session.wrong_answers
    );

    if session.out_of_attempts(rules) {
        return Ok(finish(&category, EndReason::OutOfAttempts));
    }
    advance(pool, session, category, Some(choice.is_correct)).await
}

async fn advance(
    pool: &SqlitePool,
    session: &mut QuizSession,
    category: Category,
    previous_is_correct: Option<bool>,
) -> Result<QuizStep, QuizError> {
    let Some(question) = next_question(pool, category.id, &session.asked_questions).await? else {
        // only an answer can move a run from a question to the end
        return Ok(match previous_is_correct {
            Some(_) => finish(&category, EndReason::Exhausted),
            None => already_ended(&category, EndReason::Exhausted),
        });
    };
    session.record_asked(question.id);
    render(pool, session, category, question, previous_is_correct).await
}

async fn redisplay(
    pool: &SqlitePool,
    session: &mut QuizSession,
    category: Category,
) -> Result<QuizStep, QuizError> {
    let current = match session.current_question() {
        Some(id) => match questions::get_question(pool, id).await {
            Ok(question) => Some(question),
            Err(sqlx::Error::RowNotFound) => None,
            Err(err) => return Err(err.into()),
        },
        None => None,
    };
    match current {
        Some(question) if question.category_id == category.id => {
            render(pool, session, category, question, None).await
        }
        _ => advance(pool, session, category, None).await,
    }
}

async fn render(
    pool: &SqlitePool,
    session: &QuizSession,
    category: Category,
    question: Question,
    previous_is_correct: Option<bool>,
) -> Result<QuizStep, QuizError> {
    let choices = choices::get_choices_for_question(pool, question.id).await?;
    Ok(QuizStep::InProgress(QuestionView {
        category,
        question,
        choices,
        score: session.score,
        wrong_answers: session.wrong_answers,
        previous_is_correct,
    }))
}

fn finish(category: &Category, reason: EndReason) -> QuizStep {
    tracing::info!("Quiz for category {} ended: {}", category.name, reason.as_str());
    FINISHED_CNTR.with_label_values(&[reason.as_str()]).inc();
    QuizStep::Ended(reason)
}

/// A revisit of a run that has already ended. Not counted again.
fn already_ended(category: &Category, reason: EndReason) -> QuizStep {
    tracing::debug!("Quiz for category {} already over: {}", category.name, reason.as_str());
    QuizStep::Ended(reason)
}

fn bool_label(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
