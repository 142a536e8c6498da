#![allow(dead_code)]

use sqlx::SqlitePool;
use web_quiz::db::queries::{categories, choices, questions};
use web_quiz::db::{self, Choice};
use web_quiz::quiz::{QuestionView, QuizStep};

pub async fn test_pool() -> SqlitePool {
    let pool = db::establish_in_memory().await.expect("connect");
    db::run_migrations(&pool).await.expect("migrate");
    pool
}

/// Creates a category with `count` questions, each with one correct and two wrong choices.
pub async fn seed_category(pool: &SqlitePool, name: &str, count: usize) -> i64 {
    let category_id = categories::create_category(pool, name).await.unwrap();
    for n in 0..count {
        let question_id = questions::create_question(pool, category_id, &format!("{name} #{n}"))
            .await
            .unwrap();
        choices::create_choice(pool, question_id, "right", true)
            .await
            .unwrap();
        choices::create_choice(pool, question_id, "wrong", false)
            .await
            .unwrap();
        choices::create_choice(pool, question_id, "also wrong", false)
            .await
            .unwrap();
    }
    category_id
}

pub fn expect_question(step: QuizStep) -> QuestionView {
    match step {
        QuizStep::InProgress(view) => view,
        QuizStep::Ended(reason) => panic!("expected a question, quiz ended: {reason:?}"),
    }
}

pub fn correct_choice(view: &QuestionView) -> &Choice {
    view.choices.iter().find(|c| c.is_correct).expect("correct choice")
}

pub fn wrong_choice(view: &QuestionView) -> &Choice {
    view.choices.iter().find(|c| !c.is_correct).expect("wrong choice")
}
