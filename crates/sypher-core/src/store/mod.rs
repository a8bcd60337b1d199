//! Storage abstraction for goals.
//!
//! The [`GoalStore`] trait is the persistence boundary of the goal engine:
//! the engine never calls it, the caller layer does. Backends must be
//! `Send + Sync` to work with async runtimes.
//!
//! Updates are compare-and-swap on [`Goal::version`], which serializes
//! writers per goal: two sessions toggling the same goal cannot both win,
//! and the loser gets [`GoalError::Conflict`](crate::error::GoalError::Conflict)
//! instead of silently overwriting or merging histories. Timestamps are not
//! used as the token because two writes can share one clock tick.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Goal;

/// Abstract goal persistence.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`create`](GoalStore::create) | Insert a new goal, returning its id |
/// | [`get`](GoalStore::get) | Fetch one goal by id |
/// | [`update`](GoalStore::update) | Compare-and-swap write of a whole goal |
/// | [`delete`](GoalStore::delete) | Hard delete |
/// | [`list_by_user`](GoalStore::list_by_user) | All goals of one user |
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Persist a new goal. Fails if the id is already taken.
    async fn create(&self, goal: &Goal) -> Result<String>;

    /// Fetch a goal. `None` means no goal has this id.
    async fn get(&self, id: &str) -> Result<Option<Goal>>;

    /// Replace the stored goal with `goal`, but only if the stored
    /// `version` still equals `expected_version` (the version of the copy
    /// `goal` was derived from).
    ///
    /// Fails with `GoalError::NotFound` for an unknown id and
    /// `GoalError::Conflict` when another writer got there first.
    async fn update(&self, goal: &Goal, expected_version: u64) -> Result<()>;

    /// Delete a goal. Returns whether anything was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// All goals owned by `user_id`, oldest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Goal>>;
}
