use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::db::queries::categories;
use crate::db::queries::results::{self, NewResult};
use crate::telemetry::RESULTS_CNTR;

use super::{QuizError, QuizRules, QuizSession};

/// Contact details collected at the end of a quiz. Email uniqueness is not a form
/// concern, an existing email updates its row instead.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Enter your name, up to 100 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = 254, message = "Email address is too long")
    )]
    pub email: String,
}

impl ContactForm {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Created,
    Updated,
}

/// Stores the session's score under the submitted email. `form` is expected to be
/// normalized already.
///
/// The session is flushed only when the result is committed; on validation or
/// cooldown errors it is left untouched so the visitor can retry.
pub async fn submit(
    pool: &SqlitePool,
    session: &mut QuizSession,
    form: &ContactForm,
    now: DateTime<Utc>,
    rules: &QuizRules,
) -> Result<Recorded, QuizError> {
    if let Err(errors) = form.validate() {
        RESULTS_CNTR.with_label_values(&["invalid"]).inc();
        return Err(errors.into());
    }
    if let Some(category_id) = session.category_id {
        categories::get_category(pool, category_id)
            .await
            .map_err(QuizError::not_found("category", category_id))?;
    }

    // Takes the write lock up front so a concurrent submit for the same email
    // waits here and then sees the committed row.
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;
    let existing = results::get_result_by_email(&mut *tx, &form.email).await?;
    if let Some(existing) = &existing {
        let elapsed = now - existing.taken_at;
        if elapsed < rules.resubmit_cooldown {
            RESULTS_CNTR.with_label_values(&["cooldown"]).inc();
            tracing::info!("Rejecting resubmission for {} within cooldown", form.email);
            return Err(QuizError::Cooldown {
                email: form.email.clone(),
                retry_after: rules.resubmit_cooldown - elapsed,
            });
        }
    }
    results::upsert_result(
        &mut *tx,
        &NewResult {
            name: &form.name,
            email: &form.email,
            score: session.score,
            category_id: session.category_id,
            taken_at: now,
        },
    )
    .await?;
    tx.commit().await?;

    let recorded = match existing {
        Some(previous) => {
            tracing::info!(
                "Updated result for {}: stored {}, submitted {}",
                form.email,
                previous.score,
                session.score
            );
            Recorded::Updated
        }
        None => {
            tracing::info!("Created result for {} with score {}", form.email, session.score);
            Recorded::Created
        }
    };
    RESULTS_CNTR
        .with_label_values(&[match recorded {
            Recorded::Created => "created",
            Recorded::Updated => "updated",
        }])
        .inc();
    session.flush();
    Ok(recorded)
}
