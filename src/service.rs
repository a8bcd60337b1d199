//! Goal service: the caller layer between the CLI and the goal engine.
//!
//! Each mutation follows the same shape: load the goal from the store, run
//! a pure engine operation with `now` from the injected clock, and write the
//! result back with a compare-and-swap on the loaded `version`. A lost race
//! is reported as [`GoalError::Conflict`] and not retried.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use sypher_core::clock::Clock;
use sypher_core::engine::{apply_patch, is_overdue, roll_over, toggle_completion};
use sypher_core::error::GoalError;
use sypher_core::models::{new_goal_id, Goal, GoalPatch, GoalType, NewGoal};
use sypher_core::store::GoalStore;
use sypher_core::streak::live_streak;

/// Per-user overview used by `sypher stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub total: usize,
    pub daily: usize,
    pub weekly: usize,
    pub completed: usize,
    pub overdue: usize,
    pub total_completions: usize,
    /// Highest cached streak across the user's goals.
    pub best_streak: u32,
    /// Sum of streaks that have not lapsed as of now.
    pub active_streaks: u32,
}

pub struct GoalService {
    store: Arc<dyn GoalStore>,
    clock: Arc<dyn Clock>,
}

impl GoalService {
    pub fn new(store: Arc<dyn GoalStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        let goal = Goal::create(new_goal_id(), new_goal, self.clock.now())?;
        self.store
            .create(&goal)
            .await
            .with_context(|| format!("Failed to create goal '{}'", goal.title))?;
        tracing::info!(goal_id = %goal.id, user_id = %goal.user_id, goal_type = %goal.goal_type, "created goal");
        Ok(goal)
    }

    /// Fetch a goal as stored.
    pub async fn get_goal(&self, id: &str) -> Result<Goal> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| GoalError::NotFound(id.to_string()).into())
    }

    /// A goal as of now, with a completion flag from an earlier period
    /// cleared. Nothing is written back.
    pub async fn view_goal(&self, id: &str) -> Result<Goal> {
        let goal = self.get_goal(id).await?;
        Ok(self.as_of_now(goal, self.clock.now()))
    }

    /// A user's goals as of now: completion flags from earlier periods are
    /// cleared for display. Nothing is written back.
    pub async fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        let now = self.clock.now();
        let goals = self.store.list_by_user(user_id).await?;
        Ok(goals.into_iter().map(|g| self.as_of_now(g, now)).collect())
    }

    // A clock behind the goal's creation leaves the stored value as is.
    fn as_of_now(&self, goal: Goal, now: DateTime<Utc>) -> Goal {
        match roll_over(&goal, now) {
            Ok(rolled) => rolled,
            Err(e) => {
                tracing::warn!(goal_id = %goal.id, error = %e, "roll over skipped");
                goal
            }
        }
    }

    pub async fn toggle_goal(&self, id: &str) -> Result<Goal> {
        let now = self.clock.now();
        let current = self.get_goal(id).await?;

        let next = roll_over(&current, now).and_then(|g| toggle_completion(&g, now));
        let next = match next {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!(goal_id = %id, error = %e, "toggle rejected");
                return Err(e.into());
            }
        };

        self.store.update(&next, current.version).await?;
        tracing::info!(
            goal_id = %id,
            completed = next.completed,
            streak = next.streak,
            "toggled goal"
        );
        Ok(next)
    }

    pub async fn edit_goal(&self, id: &str, patch: GoalPatch) -> Result<Goal> {
        let current = self.get_goal(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let next = apply_patch(&current, &patch, self.clock.now())?;
        self.store.update(&next, current.version).await?;
        tracing::info!(goal_id = %id, "edited goal");
        Ok(next)
    }

    pub async fn delete_goal(&self, id: &str) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(GoalError::NotFound(id.to_string()).into());
        }
        tracing::info!(goal_id = %id, "deleted goal");
        Ok(())
    }

    pub async fn summarize(&self, user_id: &str) -> Result<UserSummary> {
        let now = self.clock.now();
        let goals = self.list_goals(user_id).await?;

        let mut summary = UserSummary {
            user_id: user_id.to_string(),
            total: goals.len(),
            daily: 0,
            weekly: 0,
            completed: 0,
            overdue: 0,
            total_completions: 0,
            best_streak: 0,
            active_streaks: 0,
        };

        for goal in &goals {
            match goal.goal_type {
                GoalType::Daily => summary.daily += 1,
                GoalType::Weekly => summary.weekly += 1,
            }
            if goal.completed {
                summary.completed += 1;
            }
            if is_overdue(goal, now) {
                summary.overdue += 1;
            }
            summary.total_completions += goal.completion_history.len();
            summary.best_streak = summary.best_streak.max(goal.streak);
            summary.active_streaks += live_streak(goal.goal_type, &goal.completion_history, now);
        }

        Ok(summary)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
