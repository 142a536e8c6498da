use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuizResult {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub score: i64,
    pub category_id: Option<i64>,
    pub taken_at: DateTime<Utc>,
}

pub struct NewResult<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub score: i64,
    pub category_id: Option<i64>,
    pub taken_at: DateTime<Utc>,
}

pub async fn get_all_results(pool: &SqlitePool) -> sqlx::Result<Vec<QuizResult>> {
    sqlx::query_as::<_, QuizResult>(
        r#"
SELECT id, name, email, score, category_id, taken_at FROM quiz_results ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_result_by_email<'e, E>(executor: E, email: &str) -> sqlx::Result<Option<QuizResult>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, QuizResult>(
        r#"
SELECT id, name, email, score, category_id, taken_at
FROM quiz_results
WHERE quiz_results.email = ?1
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

/// Creates the row for `email` or refreshes it, keeping the best score ever stored.
pub async fn upsert_result<'e, E>(executor: E, result: &NewResult<'_>) -> sqlx::Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
INSERT INTO quiz_results (name, email, score, category_id, taken_at) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (email) DO UPDATE SET
    name = excluded.name,
    score = MAX(quiz_results.score, excluded.score),
    category_id = excluded.category_id,
    taken_at = excluded.taken_at
        "#,
    )
    .bind(result.name)
    .bind(result.email)
    .bind(result.score)
    .bind(result.category_id)
    .bind(result.taken_at)
    .execute(executor)
    .await?;
    Ok(())
}
