use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::configuration::SessionSettings;
use crate::db::queries::sessions;
use crate::quiz::{QuizError, QuizSession};

/// Quiz state of the visitor behind the session cookie.
///
/// Handlers mutate `state` and persist it with [`VisitorSession::save`]; nothing is
/// written back implicitly.
pub struct VisitorSession {
    id: Uuid,
    cookie_name: String,
    fresh: bool,
    pub state: QuizSession,
}

pub enum SessionCookie {
    Keep,
    Set { name: String, id: Uuid },
    Expire { name: String },
}

impl<S> FromRequestParts<S> for VisitorSession
where
    SqlitePool: FromRef<S>,
    SessionSettings: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = QuizError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);
        let settings = SessionSettings::from_ref(state);

        if let Some(id) = session_id_from_headers(&parts.headers, &settings.cookie_name) {
            if let Some(raw) = sessions::load_session(&pool, id).await? {
                return Ok(Self {
                    id,
                    cookie_name: settings.cookie_name,
                    fresh: false,
                    state: QuizSession::from_stored(&raw),
                });
            }
            tracing::debug!("Session {id} is unknown or expired, issuing a new one");
        }
        Ok(Self {
            id: Uuid::new_v4(),
            cookie_name: settings.cookie_name,
            fresh: true,
            state: QuizSession::default(),
        })
    }
}

impl VisitorSession {
    pub async fn save(&self, pool: &SqlitePool) -> Result<(), QuizError> {
        let raw = serde_json::to_string(&self.state)?;
        sessions::save_session(pool, self.id, &raw, Utc::now()).await?;
        Ok(())
    }

    /// Drops the stored state and tells the browser to forget the cookie.
    pub async fn destroy(mut self, pool: &SqlitePool) -> Result<SessionCookie, QuizError> {
        self.state.flush();
        sessions::delete_session(pool, self.id).await?;
        Ok(SessionCookie::Expire {
            name: self.cookie_name,
        })
    }

    pub fn cookie(&self) -> SessionCookie {
        if self.fresh {
            SessionCookie::Set {
                name: self.cookie_name.clone(),
                id: self.id,
            }
        } else {
            SessionCookie::Keep
        }
    }
}

impl IntoResponseParts for SessionCookie {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let cookie = match self {
            SessionCookie::Keep => return Ok(res),
            // no Max-Age: the cookie lives as long as the browser session
            SessionCookie::Set { name, id } => {
                format!("{name}={id}; Path=/; HttpOnly; SameSite=Lax")
            }
            SessionCookie::Expire { name } => {
                format!("{name}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
            }
        };
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                res.headers_mut().append(SET_COOKIE, value);
            }
            Err(err) => tracing::error!("Invalid session cookie {cookie:?}: {err}"),
        }
        Ok(res)
    }
}

fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
