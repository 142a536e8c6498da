pub mod queries;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Error;

pub use queries::categories::Category;
pub use queries::choices::Choice;
pub use queries::questions::Question;
pub use queries::results::QuizResult;

pub async fn establish_connection(path: &str) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str(format!("sqlite:{}", path).as_str())?
        .create_if_missing(true)
        .foreign_keys(true);
    SqlitePool::connect_with(options).await
}

/// Single-connection pool over a private in-memory database, used by tests and dry runs.
pub async fn establish_in_memory() -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Upserts the whole catalog by id in one transaction, parents first.
pub async fn import_catalog(
    pool: &SqlitePool,
    categories: &[Category],
    questions: &[Question],
    choices: &[Choice],
) -> Result<(), Error> {
    let mut tx = pool.begin().await?;
    for category in categories {
        queries::categories::upsert_category(&mut *tx, category).await?;
    }
    for question in questions {
        queries::questions::upsert_question(&mut *tx, question).await?;
    }
    for choice in choices {
        queries::choices::upsert_choice(&mut *tx, choice).await?;
    }
    tx.commit().await
}
