//! In-memory [`GoalStore`] implementation for tests and embedding.
//!
//! Goals live in a `HashMap` behind `std::sync::RwLock`. The write lock is
//! held across the compare and the swap, so updates are atomic per store.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::GoalError;
use crate::models::Goal;

use super::GoalStore;

/// In-memory goal store.
pub struct InMemoryStore {
    goals: RwLock<HashMap<String, Goal>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            goals: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.goals.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GoalStore for InMemoryStore {
    async fn create(&self, goal: &Goal) -> Result<String> {
        let mut goals = self.goals.write().unwrap_or_else(|e| e.into_inner());
        if goals.contains_key(&goal.id) {
            return Err(GoalError::Conflict(goal.id.clone()).into());
        }
        goals.insert(goal.id.clone(), goal.clone());
        Ok(goal.id.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Goal>> {
        let goals = self.goals.read().unwrap_or_else(|e| e.into_inner());
        Ok(goals.get(id).cloned())
    }

    async fn update(&self, goal: &Goal, expected_version: u64) -> Result<()> {
        let mut goals = self.goals.write().unwrap_or_else(|e| e.into_inner());
        let stored = goals
            .get_mut(&goal.id)
            .ok_or_else(|| GoalError::NotFound(goal.id.clone()))?;
        if stored.version != expected_version {
            tracing::warn!(
                goal_id = %goal.id,
                expected = expected_version,
                stored = stored.version,
                "stale update rejected"
            );
            return Err(GoalError::Conflict(goal.id.clone()).into());
        }
        *stored = goal.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut goals = self.goals.write().unwrap_or_else(|e| e.into_inner());
        Ok(goals.remove(id).is_some())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        let goals = self.goals.read().unwrap_or_else(|e| e.into_inner());
        let mut owned: Vec<Goal> = goals
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(owned)
    }
}
