use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Raw json document stored for the session, if any.
pub async fn load_session(pool: &SqlitePool, id: Uuid) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar(
        r#"
SELECT state FROM sessions WHERE sessions.id = ?1
        "#,
    )
    .bind(id.hyphenated())
    .fetch_optional(pool)
    .await
}

pub async fn save_session(
    pool: &SqlitePool,
    id: Uuid,
    state: &str,
    now: DateTime<Utc>,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
INSERT INTO sessions (id, state, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT (id) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at
        "#,
    )
    .bind(id.hyphenated())
    .bind(state)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_session(pool: &SqlitePool, id: Uuid) -> sqlx::Result<()> {
    sqlx::query(
        r#"
DELETE FROM sessions WHERE sessions.id = ?1
        "#,
    )
    .bind(id.hyphenated())
    .execute(pool)
    .await?;
    Ok(())
}

/// Removes sessions untouched since `older_than`, returns how many were dropped.
pub async fn delete_expired_sessions(
    pool: &SqlitePool,
    older_than: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let deleted = sqlx::query(
        r#"
DELETE FROM sessions WHERE sessions.updated_at < ?1
        "#,
    )
    .bind(older_than)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(deleted)
}
