use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use chrono::Utc;
use itertools::Itertools;
use sqlx::SqlitePool;
use validator::ValidationErrors;

use crate::{
    db::queries::categories::get_category,
    quiz::{
        leaderboard::top_results, recorder, ContactForm, LeaderboardEntry, QuizError, QuizRules,
    },
    server::{app::AppState, session::VisitorSession},
};

use super::ApiResponse;

struct LeaderboardRow {
    position: usize,
    name: String,
    score: i64,
    taken_at: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz/partials/leaderboard.html")]
struct LeaderboardPartial {
    rows: Vec<LeaderboardRow>,
}

impl LeaderboardPartial {
    fn new(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            rows: entries
                .into_iter()
                .enumerate()
                .map(|(n, entry)| LeaderboardRow {
                    position: n + 1,
                    name: entry.name,
                    score: entry.score,
                    taken_at: entry.taken_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz/quiz_end.html")]
struct QuizEndPage {
    category_name: Option<String>,
    score: i64,
    wrong_answers: i64,
    total_questions: usize,
    name: String,
    email: String,
    errors: Vec<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz/partials/quiz_end_form.html")]
struct QuizEndForm {
    score: i64,
    wrong_answers: i64,
    total_questions: usize,
    name: String,
    email: String,
    errors: Vec<String>,
}

impl QuizEndForm {
    fn new(session: &VisitorSession, form: ContactForm, errors: Vec<String>) -> Self {
        Self {
            score: session.state.score,
            wrong_answers: session.state.wrong_answers,
            total_questions: session.state.total_questions(),
            name: form.name,
            email: form.email,
            errors,
        }
    }
}

fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid {field}"),
            })
        })
        .collect()
}

async fn quiz_end(
    State(pool): State<SqlitePool>,
    session: VisitorSession,
) -> ApiResponse<QuizEndPage> {
    let category_name = match session.state.category_id {
        Some(id) => Some(
            get_category(&pool, id)
                .await
                .map_err(QuizError::not_found("category", id))?
                .name,
        ),
        None => None,
    };
    Ok(QuizEndPage {
        category_name,
        score: session.state.score,
        wrong_answers: session.state.wrong_answers,
        total_questions: session.state.total_questions(),
        name: String::new(),
        email: String::new(),
        errors: vec![],
    })
}

async fn submit_result(
    State(pool): State<SqlitePool>,
    State(rules): State<QuizRules>,
    mut session: VisitorSession,
    Form(form): Form<ContactForm>,
) -> ApiResponse<Response> {
    let form = form.normalized();
    let outcome = recorder::submit(&pool, &mut session.state, &form, Utc::now(), &rules).await;
    match outcome {
        Ok(_) => {
            // the result is committed, drop the session before anything else can fail
            let cookie = session.destroy(&pool).await?;
            let entries = top_results(&pool, rules.leaderboard_size).await?;
            Ok((cookie, LeaderboardPartial::new(entries)).into_response())
        }
        Err(QuizError::Validation(errors)) => {
            let messages = validation_messages(&errors);
            Ok(QuizEndForm::new(&session, form, messages).into_response())
        }
        Err(QuizError::Cooldown { retry_after, .. }) => {
            let minutes = (retry_after.num_seconds() + 59) / 60;
            let message = format!(
                "You can update your result at most once every {} min. Try again in {minutes} min.",
                rules.resubmit_cooldown.num_minutes()
            );
            Ok(QuizEndForm::new(&session, form, vec![message]).into_response())
        }
        Err(other) => Err(other),
    }
}

async fn leaderboard(
    State(pool): State<SqlitePool>,
    State(rules): State<QuizRules>,
) -> ApiResponse<LeaderboardPartial> {
    let entries = top_results(&pool, rules.leaderboard_size).await?;
    Ok(LeaderboardPartial::new(entries))
}

pub fn results_router(state: AppState) -> Router {
    Router::new()
        .route("/quiz/end", get(quiz_end).post(submit_result))
        .route("/leaderboard", get(leaderboard))
        .with_state(state)
}
