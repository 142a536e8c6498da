use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    db::{Category, Choice, Question},
    quiz::{flow, QuestionView, QuizRules, QuizStep},
    server::{
        app::AppState,
        deserializers::empty_string_as_none,
        session::{SessionCookie, VisitorSession},
    },
};

use super::ApiResponse;

#[derive(Deserialize)]
struct AnswerForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    choice: Option<i64>,
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz/quiz.html")]
struct QuizPage {
    category: Category,
    question: Question,
    choices: Vec<Choice>,
    score: i64,
    wrong_answers: i64,
    answered: bool,
    previous_is_correct: bool,
}

impl From<QuestionView> for QuizPage {
    fn from(view: QuestionView) -> Self {
        Self {
            category: view.category,
            question: view.question,
            choices: view.choices,
            score: view.score,
            wrong_answers: view.wrong_answers,
            answered: view.previous_is_correct.is_some(),
            previous_is_correct: view.previous_is_correct.unwrap_or(false),
        }
    }
}

fn respond(cookie: SessionCookie, step: QuizStep) -> Response {
    match step {
        QuizStep::InProgress(view) => (cookie, QuizPage::from(view)).into_response(),
        QuizStep::Ended(_) => (cookie, Redirect::to("/quiz/end")).into_response(),
    }
}

async fn quiz_view(
    State(pool): State<SqlitePool>,
    State(rules): State<QuizRules>,
    Path(category_id): Path<i64>,
    mut session: VisitorSession,
) -> ApiResponse<Response> {
    let step = flow::show_question(&pool, &mut session.state, category_id, &rules).await?;
    session.save(&pool).await?;
    Ok(respond(session.cookie(), step))
}

async fn check_answer(
    State(pool): State<SqlitePool>,
    State(rules): State<QuizRules>,
    Path(category_id): Path<i64>,
    mut session: VisitorSession,
    Form(answer): Form<AnswerForm>,
) -> ApiResponse<Response> {
    let step = flow::check_answer(
        &pool,
        &mut session.state,
        category_id,
        answer.choice,
        &rules,
    )
    .await?;
    session.save(&pool).await?;
    Ok(respond(session.cookie(), step))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quiz/{category_id}/", get(quiz_view))
        .route("/quiz/{category_id}/check_answer/", post(check_answer))
        .with_state(state)
}
