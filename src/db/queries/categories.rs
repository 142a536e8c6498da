use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, name
FROM categories
ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Category> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, name FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn create_category(pool: &SqlitePool, name: &str) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO categories (name) VALUES (?1)
        "#,
    )
    .bind(name)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub(crate) async fn upsert_category(
    conn: &mut SqliteConnection,
    category: &Category,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
INSERT INTO categories (id, name) VALUES (?1, ?2)
ON CONFLICT (id) DO UPDATE SET name = excluded.name
        "#,
    )
    .bind(category.id)
    .bind(&category.name)
    .execute(conn)
    .await?;
    Ok(())
}
