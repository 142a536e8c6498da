use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::quiz::QuizRules;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub quiz: QuizSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_wrong_answers: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub cooldown_minutes: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub leaderboard_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub cookie_name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub ttl_hours: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub sweep_interval_minutes: u64,
}

impl Settings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}

impl QuizSettings {
    pub fn rules(&self) -> QuizRules {
        QuizRules {
            max_wrong_answers: self.max_wrong_answers,
            resubmit_cooldown: chrono::Duration::minutes(self.cooldown_minutes),
            leaderboard_size: self.leaderboard_size,
        }
    }
}

impl SessionSettings {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8080)?
        .set_default("application.static_dir", "static")?
        .set_default("database.path", "quiz.db")?
        .set_default("quiz.max_wrong_answers", 3)?
        .set_default("quiz.cooldown_minutes", 60)?
        .set_default("quiz.leaderboard_size", 10)?
        .set_default("session.cookie_name", "quiz_session")?
        .set_default("session.ttl_hours", 24)?
        .set_default("session.sweep_interval_minutes", 30)
}

/// Defaults, then an optional `configuration.*` file, then `QUIZ_SECTION__KEY` variables.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();
    defaults()?
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix("QUIZ")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
