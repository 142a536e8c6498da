use chrono::{DateTime, Utc};
use itertools::Itertools;
use sqlx::SqlitePool;

use crate::db::queries::results::get_all_results;
use crate::db::QuizResult;

use super::QuizError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub email: String,
    pub name: String,
    pub score: i64,
    pub taken_at: DateTime<Utc>,
}

/// Collapses results to one entry per email (best score, latest time, latest name),
/// then orders by score descending and time ascending.
pub fn rank<I>(results: I, limit: usize) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = QuizResult>,
{
    results
        .into_iter()
        .into_group_map_by(|result| result.email.clone())
        .into_iter()
        .filter_map(|(email, rows)| {
            let score = rows.iter().map(|row| row.score).max()?;
            let latest = rows.into_iter().max_by_key(|row| row.taken_at)?;
            Some(LeaderboardEntry {
                email,
                name: latest.name,
                score,
                taken_at: latest.taken_at,
            })
        })
        .sorted_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.taken_at.cmp(&b.taken_at))
                .then_with(|| a.email.cmp(&b.email))
        })
        .take(limit)
        .collect()
}

pub async fn top_results(pool: &SqlitePool, limit: usize) -> Result<Vec<LeaderboardEntry>, QuizError> {
    let results = get_all_results(pool).await?;
    Ok(rank(results, limit))
}
