use std::fs::create_dir_all;

use anyhow::Context;
use web_quiz::configuration::get_configuration;
use web_quiz::db;
use web_quiz::server::app::{run_server, spawn_session_sweeper, AppState};
use web_quiz::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = get_configuration().context("Failed to read configuration")?;

    let static_dir = settings.application.static_dir.clone();
    if !static_dir.exists() {
        create_dir_all(&static_dir).context("Failed to create directory for static content")?;
    }
    if !static_dir.is_dir() {
        anyhow::bail!("application.static_dir should be a directory or not exist");
    }

    let pool = db::establish_connection(&settings.database.path)
        .await
        .with_context(|| format!("Cannot open database {}", settings.database.path))?;
    tracing::info!("Running db migrations...");
    db::run_migrations(&pool).await?;

    spawn_session_sweeper(pool.clone(), settings.session.clone());

    let state = AppState {
        pool,
        static_dir,
        rules: settings.quiz.rules(),
        session: settings.session.clone(),
    };
    run_server(state, &settings.address()).await
}
