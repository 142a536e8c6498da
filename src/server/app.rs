use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, http::StatusCode, routing::get, Router};
use chrono::Utc;
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, quiz_router, results_router};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::configuration::SessionSettings;
use crate::db::queries::sessions::delete_expired_sessions;
use crate::quiz::QuizRules;

use super::routes;

#[derive(FromRef, Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub static_dir: PathBuf,
    pub rules: QuizRules,
    pub session: SessionSettings,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .nest_service("/static", ServeDir::new(state.static_dir.clone()))
        .merge(category_router(state.clone()))
        .merge(quiz_router(state.clone()))
        .merge(results_router(state))
        .fallback(|| async {
            tracing::info!("Fallback");
            StatusCode::NOT_FOUND
        })
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically deletes sessions idle for longer than the configured ttl.
pub fn spawn_session_sweeper(pool: SqlitePool, settings: SessionSettings) {
    let period = Duration::from_secs(settings.sweep_interval_minutes.max(1) * 60);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            match delete_expired_sessions(&pool, Utc::now() - settings.ttl()).await {
                Ok(0) => {}
                Ok(n) => tracing::info!("Removed {n} expired sessions"),
                Err(err) => tracing::warn!("Failed to remove expired sessions: {err}"),
            }
        }
    });
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    if let Err(err) = encoder.encode(&metrics, &mut buf) {
        tracing::error!("Failed to encode metrics: {err}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buf,
    )
        .into_response()
}
