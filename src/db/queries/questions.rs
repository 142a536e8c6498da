use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub category_id: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, text, category_id FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, text, category_id FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn count_questions_for_category(pool: &SqlitePool, category_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
SELECT COUNT(*) FROM questions WHERE questions.category_id = ?1
        "#,
    )
    .bind(category_id)
    .fetch_one(pool)
    .await
}

/// Picks one question of the category uniformly at random, skipping every id in `excluded`.
pub async fn get_random_question_excluding(
    pool: &SqlitePool,
    category_id: i64,
    excluded: &[i64],
) -> sqlx::Result<Option<Question>> {
    // sqlite cannot bind a list, so the exclusion set travels as a json array
    let excluded = serde_json::to_string(excluded).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, text, category_id
FROM questions
WHERE questions.category_id = ?1
  AND questions.id NOT IN (SELECT value FROM json_each(?2))
ORDER BY RANDOM()
LIMIT 1
        "#,
    )
    .bind(category_id)
    .bind(excluded)
    .fetch_optional(pool)
    .await
}

pub async fn create_question(pool: &SqlitePool, category_id: i64, text: &str) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (category_id, text) VALUES (?1, ?2)
        "#,
    )
    .bind(category_id)
    .bind(text)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub(crate) async fn upsert_question(
    conn: &mut SqliteConnection,
    question: &Question,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
INSERT INTO questions (id, text, category_id) VALUES (?1, ?2, ?3)
ON CONFLICT (id) DO UPDATE SET text = excluded.text, category_id = excluded.category_id
        "#,
    )
    .bind(question.id)
    .bind(&question.text)
    .bind(question.category_id)
    .execute(conn)
    .await?;
    Ok(())
}
