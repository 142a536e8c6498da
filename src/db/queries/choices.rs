use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
}

pub async fn get_all_choices(pool: &SqlitePool) -> sqlx::Result<Vec<Choice>> {
    sqlx::query_as::<_, Choice>(
        r#"
SELECT id, question_id, text, is_correct FROM choices ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_choice(pool: &SqlitePool, id: i64) -> sqlx::Result<Choice> {
    sqlx::query_as::<_, Choice>(
        r#"
SELECT id, question_id, text, is_correct FROM choices WHERE choices.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn get_choices_for_question(
    pool: &SqlitePool,
    question_id: i64,
) -> sqlx::Result<Vec<Choice>> {
    sqlx::query_as::<_, Choice>(
        r#"
SELECT id, question_id, text, is_correct
FROM choices
WHERE choices.question_id = ?1
ORDER BY id
        "#,
    )
    .bind(question_id)
    .fetch_all(pool)
    .await
}

pub async fn create_choice(
    pool: &SqlitePool,
    question_id: i64,
    text: &str,
    is_correct: bool,
) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO choices (question_id, text, is_correct) VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(question_id)
    .bind(text)
    .bind(is_correct)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub(crate) async fn upsert_choice(conn: &mut SqliteConnection, choice: &Choice) -> sqlx::Result<()> {
    sqlx::query(
        r#"
INSERT INTO choices (id, question_id, text, is_correct) VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (id) DO UPDATE SET
    question_id = excluded.question_id,
    text = excluded.text,
    is_correct = excluded.is_correct
        "#,
    )
    .bind(choice.id)
    .bind(choice.question_id)
    .bind(&choice.text)
    .bind(choice.is_correct)
    .execute(conn)
    .await?;
    Ok(())
}
