//! SQLite-backed [`GoalStore`] implementation.
//!
//! One row per goal in the `goals` table. Timestamps are stored as Unix
//! milliseconds and the completion history as a JSON array of them. The
//! `streak` column is written for convenience of ad-hoc queries but is
//! recomputed from the history on every load. Updates compare and bump the
//! `version` column.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use sypher_core::engine::check_history;
use sypher_core::error::GoalError;
use sypher_core::models::{Goal, GoalType};
use sypher_core::store::GoalStore;
use sypher_core::streak::calculate_streak;

const GOAL_COLUMNS: &str = "id, user_id, title, description, goal_type, deadline, completed, \
     completion_history_json, created_at, updated_at, version";

/// SQLite implementation of the [`GoalStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow!("timestamp out of range: {}", ms))
}

fn version_to_i64(version: u64) -> Result<i64> {
    i64::try_from(version).with_context(|| format!("goal version {} out of range", version))
}

fn history_to_json(history: &[DateTime<Utc>]) -> Result<String> {
    let millis: Vec<i64> = history.iter().map(|ts| to_millis(*ts)).collect();
    Ok(serde_json::to_string(&millis)?)
}

fn history_from_json(json: &str) -> Result<Vec<DateTime<Utc>>> {
    let millis: Vec<i64> =
        serde_json::from_str(json).with_context(|| "Failed to parse completion history")?;
    millis.into_iter().map(from_millis).collect()
}

fn row_to_goal(row: &SqliteRow) -> Result<Goal> {
    let goal_type: String = row.get("goal_type");
    let goal_type: GoalType = goal_type.parse()?;
    let history_json: String = row.get("completion_history_json");
    let completion_history = history_from_json(&history_json)?;

    let goal = Goal {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        goal_type,
        deadline: from_millis(row.get("deadline"))?,
        completed: row.get("completed"),
        streak: calculate_streak(goal_type, &completion_history),
        completion_history,
        created_at: from_millis(row.get("created_at"))?,
        updated_at: from_millis(row.get("updated_at"))?,
        version: u64::try_from(row.get::<i64, _>("version"))
            .with_context(|| "negative goal version")?,
    };

    if let Err(e) = check_history(&goal) {
        tracing::warn!(goal_id = %goal.id, error = %e, "stored goal has inconsistent history");
    }
    Ok(goal)
}

#[async_trait]
impl GoalStore for SqliteStore {
    async fn create(&self, goal: &Goal) -> Result<String> {
        let result = sqlx::query(
            r#"
            INSERT INTO goals (id, user_id, title, description, goal_type, deadline,
                               completed, completion_history_json, streak,
                               created_at, updated_at, version)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&goal.id)
        .bind(&goal.user_id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.goal_type.as_str())
        .bind(to_millis(goal.deadline))
        .bind(goal.completed)
        .bind(history_to_json(&goal.completion_history)?)
        .bind(i64::from(goal.streak))
        .bind(to_millis(goal.created_at))
        .bind(to_millis(goal.updated_at))
        .bind(version_to_i64(goal.version)?)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(goal_id = %goal.id, user_id = %goal.user_id, "inserted goal");
                Ok(goal.id.clone())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(GoalError::Conflict(goal.id.clone()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Goal>> {
        let row = sqlx::query(&format!("SELECT {} FROM goals WHERE id = ?", GOAL_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_goal).transpose()
    }

    async fn update(&self, goal: &Goal, expected_version: u64) -> Result<()> {
        // type, deadline, user_id and created_at are immutable and never written here.
        let result = sqlx::query(
            r#"
            UPDATE goals SET
                title = ?,
                description = ?,
                completed = ?,
                completion_history_json = ?,
                streak = ?,
                updated_at = ?,
                version = ?
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.completed)
        .bind(history_to_json(&goal.completion_history)?)
        .bind(i64::from(goal.streak))
        .bind(to_millis(goal.updated_at))
        .bind(version_to_i64(goal.version)?)
        .bind(&goal.id)
        .bind(version_to_i64(expected_version)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            tracing::debug!(goal_id = %goal.id, "updated goal");
            return Ok(());
        }

        let exists: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM goals WHERE id = ?")
            .bind(&goal.id)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            tracing::warn!(goal_id = %goal.id, expected = expected_version, "stale update rejected");
            Err(GoalError::Conflict(goal.id.clone()).into())
        } else {
            Err(GoalError::NotFound(goal.id.clone()).into())
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM goals WHERE user_id = ? ORDER BY created_at ASC, id ASC",
            GOAL_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_goal).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_history_json_round_trip_keeps_order() {
        let history = vec![
            Utc.with_ymd_and_hms(2024, 6, 9, 20, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap(),
        ];
        let json = history_to_json(&history).unwrap();
        assert_eq!(json, "[1717963200000,1718010000000]");
        assert_eq!(history_from_json(&json).unwrap(), history);
    }

    #[test]
    fn test_history_json_rejects_garbage() {
        assert!(history_from_json("not json").is_err());
        assert!(history_from_json("[\"2024-06-10\"]").is_err());
    }
}
