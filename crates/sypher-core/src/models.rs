//! Core data models for goal tracking.
//!
//! A [`Goal`] is a user-defined objective tracked on a daily or weekly
//! cadence. Goals are treated as immutable values: engine operations take
//! `&Goal` and return a new `Goal`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GoalError, Result};
use crate::streak::calculate_streak;

/// Cadence of a goal. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Daily,
    Weekly,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Daily => "daily",
            GoalType::Weekly => "weekly",
        }
    }

    /// Length of one period, used to compute the deadline at creation.
    pub fn period_length(&self) -> Duration {
        match self {
            GoalType::Daily => Duration::days(1),
            GoalType::Weekly => Duration::days(7),
        }
    }

    /// Unit shown next to a streak count ("3 day streak").
    pub fn unit(&self) -> &'static str {
        match self {
            GoalType::Daily => "day",
            GoalType::Weekly => "week",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(GoalType::Daily),
            "weekly" => Ok(GoalType::Weekly),
            other => Err(GoalError::Validation(format!(
                "unknown goal type '{}': must be daily or weekly",
                other
            ))),
        }
    }
}

/// A tracked goal.
///
/// `streak` is a cache of [`calculate_streak`] over `completion_history`.
/// Every constructor and engine operation recomputes it, so it never drifts
/// from the history.
///
/// `version` starts at 0 and grows by one with every persisted change. Stores
/// compare it on update, so a write based on an older copy always loses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub deadline: DateTime<Utc>,
    pub completed: bool,
    pub completion_history: Vec<DateTime<Utc>>,
    pub streak: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

/// Input for creating a goal. Ids come from
/// [`new_goal_id`] and timestamps from the caller's clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGoal {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
}

/// Partial update of the editable display fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl GoalPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Generate a fresh opaque goal identifier.
pub fn new_goal_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(GoalError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

impl Goal {
    /// Build a new, incomplete goal created at `now`.
    ///
    /// The deadline is `now` plus one period and is never recomputed.
    pub fn create(id: impl Into<String>, new_goal: NewGoal, now: DateTime<Utc>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(GoalError::Validation("id must not be empty".to_string()));
        }
        if new_goal.user_id.trim().is_empty() {
            return Err(GoalError::Validation(
                "user_id must not be empty".to_string(),
            ));
        }
        validate_title(&new_goal.title)?;

        Ok(Self {
            id,
            user_id: new_goal.user_id,
            title: new_goal.title.trim().to_string(),
            description: new_goal.description,
            goal_type: new_goal.goal_type,
            deadline: now + new_goal.goal_type.period_length(),
            completed: false,
            completion_history: Vec::new(),
            streak: 0,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Most recent completion, if any.
    pub fn last_completion(&self) -> Option<DateTime<Utc>> {
        self.completion_history.iter().max().copied()
    }

    /// Streak derived from the history, ignoring the cached field.
    pub fn derived_streak(&self) -> u32 {
        calculate_streak(self.goal_type, &self.completion_history)
    }
}

pub(crate) fn validate_patch(patch: &GoalPatch) -> Result<()> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn new_goal(goal_type: GoalType) -> NewGoal {
        NewGoal {
            user_id: "user-1".to_string(),
            title: "Solve one problem".to_string(),
            description: String::new(),
            goal_type,
        }
    }

    #[test]
    fn test_create_daily_deadline() {
        let now = ts(2024, 6, 10, 9);
        let goal = Goal::create("g1", new_goal(GoalType::Daily), now).unwrap();
        assert_eq!(goal.deadline, ts(2024, 6, 11, 9));
        assert!(!goal.completed);
        assert_eq!(goal.streak, 0);
        assert!(goal.completion_history.is_empty());
        assert_eq!(goal.created_at, now);
        assert_eq!(goal.updated_at, now);
        assert_eq!(goal.version, 0);
    }

    #[test]
    fn test_create_weekly_deadline() {
        let now = ts(2024, 6, 10, 9);
        let goal = Goal::create("g1", new_goal(GoalType::Weekly), now).unwrap();
        assert_eq!(goal.deadline, ts(2024, 6, 17, 9));
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let mut input = new_goal(GoalType::Daily);
        input.title = "   ".to_string();
        let err = Goal::create("g1", input, ts(2024, 6, 10, 9)).unwrap_err();
        assert!(matches!(err, GoalError::Validation(_)));
    }

    #[test]
    fn test_create_rejects_empty_user() {
        let mut input = new_goal(GoalType::Daily);
        input.user_id = String::new();
        let err = Goal::create("g1", input, ts(2024, 6, 10, 9)).unwrap_err();
        assert!(matches!(err, GoalError::Validation(_)));
    }

    #[test]
    fn test_goal_type_parse() {
        assert_eq!("daily".parse::<GoalType>().unwrap(), GoalType::Daily);
        assert_eq!(" Weekly ".parse::<GoalType>().unwrap(), GoalType::Weekly);
        assert!("monthly".parse::<GoalType>().is_err());
    }

    #[test]
    fn test_goal_serializes_type_lowercase() {
        let goal = Goal::create("g1", new_goal(GoalType::Weekly), ts(2024, 6, 10, 9)).unwrap();
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["type"], "weekly");
        assert_eq!(json["user_id"], "user-1");
    }

    #[test]
    fn test_new_goal_ids_unique() {
        assert_ne!(new_goal_id(), new_goal_id());
    }
}
