//! # Goal Engine
//!
//! Pure transformations of [`Goal`] values. Nothing here performs I/O or
//! reads the system clock: callers pass `now` in (usually from a
//! [`Clock`](crate::clock::Clock)) and persist the returned goal through a
//! [`GoalStore`](crate::store::GoalStore).
//!
//! Every operation either returns a complete new `Goal` or an error; the
//! input is never modified. Operations meant to be persisted
//! ([`toggle_completion`], [`apply_patch`]) bump `version` by one and never
//! move `updated_at` backwards.
//!
//! ```text
//!              toggle_completion
//!  Incomplete ───────────────────▶ Complete
//!      ▲                              │
//!      └──────────────────────────────┘
//!       toggle_completion / roll_over
//! ```

use chrono::{DateTime, Utc};

use crate::error::{GoalError, Result};
use crate::models::{validate_patch, Goal, GoalPatch};
use crate::period::period_of;
use crate::streak::calculate_streak;

/// Flip the completion flag of `goal` at `now`.
///
/// Marking complete appends `now` to the history. Marking incomplete keeps
/// the history as is, so the streak is unchanged. The streak is recomputed
/// from the history in both cases.
///
/// # Errors
///
/// [`GoalError::InvalidArgument`] if `now` precedes `goal.created_at`, if
/// the stored history is out of order, or if `now` is earlier than the last
/// recorded completion when completing.
pub fn toggle_completion(goal: &Goal, now: DateTime<Utc>) -> Result<Goal> {
    check_now(goal, now)?;
    check_history(goal)?;

    let mut next = goal.clone();
    if goal.completed {
        next.completed = false;
    } else {
        if let Some(last) = goal.completion_history.last() {
            if now < *last {
                return Err(GoalError::InvalidArgument(format!(
                    "completion at {} precedes last recorded completion {}",
                    now.to_rfc3339(),
                    last.to_rfc3339()
                )));
            }
        }
        next.completed = true;
        next.completion_history.push(now);
    }
    next.streak = calculate_streak(next.goal_type, &next.completion_history);
    touch(&mut next, goal, now);

    tracing::debug!(
        goal_id = %next.id,
        completed = next.completed,
        streak = next.streak,
        "toggled goal completion"
    );
    Ok(next)
}

/// Clear a stale completion flag once a new period has started.
///
/// `completed` refers to the current period only. When the last completion
/// belongs to an earlier period than `now`, the returned goal is marked
/// incomplete. History and streak are left alone.
///
/// The result is a view of the goal as of `now`; `version` is not bumped.
/// Persist it only through a following [`toggle_completion`].
pub fn roll_over(goal: &Goal, now: DateTime<Utc>) -> Result<Goal> {
    check_now(goal, now)?;

    let stale = match goal.last_completion() {
        Some(last) if goal.completed => {
            period_of(goal.goal_type, last) < period_of(goal.goal_type, now)
        }
        _ => false,
    };

    let mut next = goal.clone();
    if stale {
        next.completed = false;
        next.updated_at = now;
    }
    next.streak = calculate_streak(next.goal_type, &next.completion_history);
    Ok(next)
}

/// True when the deadline has passed and the goal is not marked complete.
pub fn is_overdue(goal: &Goal, now: DateTime<Utc>) -> bool {
    now > goal.deadline && !goal.completed
}

/// Apply an edit to the display fields.
pub fn apply_patch(goal: &Goal, patch: &GoalPatch, now: DateTime<Utc>) -> Result<Goal> {
    check_now(goal, now)?;
    validate_patch(patch)?;

    let mut next = goal.clone();
    if let Some(title) = &patch.title {
        next.title = title.trim().to_string();
    }
    if let Some(description) = &patch.description {
        next.description = description.clone();
    }
    touch(&mut next, goal, now);
    Ok(next)
}

/// Verify the history is in non-decreasing time order.
pub fn check_history(goal: &Goal) -> Result<()> {
    if let Some(pos) = goal
        .completion_history
        .windows(2)
        .position(|pair| pair[1] < pair[0])
    {
        return Err(GoalError::InvalidArgument(format!(
            "completion history of goal {} is out of order at index {}",
            goal.id,
            pos + 1
        )));
    }
    Ok(())
}

fn touch(next: &mut Goal, prev: &Goal, now: DateTime<Utc>) {
    next.version = prev.version + 1;
    next.updated_at = now.max(prev.updated_at);
}

fn check_now(goal: &Goal, now: DateTime<Utc>) -> Result<()> {
    if now < goal.created_at {
        return Err(GoalError::InvalidArgument(format!(
            "now ({}) precedes creation of goal {} ({})",
            now.to_rfc3339(),
            goal.id,
            goal.created_at.to_rfc3339()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalType, NewGoal};
    use chrono::{Duration, TimeZone};

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn goal(goal_type: GoalType, created: DateTime<Utc>) -> Goal {
        Goal::create(
            "g1",
            NewGoal {
                user_id: "user-1".to_string(),
                title: "Two LeetCode problems".to_string(),
                description: "medium or harder".to_string(),
                goal_type,
            },
            created,
        )
        .unwrap()
    }

    #[test]
    fn test_complete_appends_once() {
        let g = goal(GoalType::Daily, ts(2024, 6, 1, 8));
        let now = ts(2024, 6, 1, 9);
        let done = toggle_completion(&g, now).unwrap();

        assert!(done.completed);
        assert_eq!(done.completion_history, vec![now]);
        assert_eq!(done.streak, 1);
        assert_eq!(done.updated_at, now);
    }

    #[test]
    fn test_uncomplete_keeps_history() {
        let g = goal(GoalType::Daily, ts(2024, 6, 1, 8));
        let done = toggle_completion(&g, ts(2024, 6, 1, 9)).unwrap();
        let undone = toggle_completion(&done, ts(2024, 6, 1, 10)).unwrap();

        assert!(!undone.completed);
        assert_eq!(undone.completion_history, done.completion_history);
        assert_eq!(undone.streak, done.streak);
        assert_eq!(undone.updated_at, ts(2024, 6, 1, 10));
        assert_eq!(undone.version, 2);
    }

    #[test]
    fn test_same_tick_writes_still_bump_version() {
        let now = ts(2024, 6, 1, 8);
        let g = goal(GoalType::Daily, now);
        let done = toggle_completion(&g, now).unwrap();
        let patch = GoalPatch {
            title: None,
            description: Some("same instant".to_string()),
        };
        let edited = apply_patch(&done, &patch, now).unwrap();

        assert_eq!(done.updated_at, g.updated_at);
        assert_eq!(done.version, g.version + 1);
        assert_eq!(edited.version, done.version + 1);
    }

    #[test]
    fn test_updated_at_never_moves_backwards() {
        let g = goal(GoalType::Daily, ts(2024, 6, 1, 8));
        let done = toggle_completion(&g, ts(2024, 6, 1, 12)).unwrap();
        // Un-completing with an earlier clock is allowed but keeps the newer stamp.
        let undone = toggle_completion(&done, ts(2024, 6, 1, 10)).unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.updated_at, ts(2024, 6, 1, 12));
    }

    #[test]
    fn test_toggle_round_trip_history_growth() {
        let mut g = goal(GoalType::Daily, ts(2024, 6, 1, 8));
        let mut now = ts(2024, 6, 1, 9);
        for _ in 0..6 {
            let before = g.completion_history.len();
            let was_completed = g.completed;
            g = toggle_completion(&g, now).unwrap();
            let grown = g.completion_history.len() - before;
            assert_eq!(grown, if was_completed { 0 } else { 1 });
            assert_eq!(g.streak, g.derived_streak());
            now += Duration::hours(1);
        }
    }

    #[test]
    fn test_toggle_does_not_mutate_input() {
        let g = goal(GoalType::Daily, ts(2024, 6, 1, 8));
        let snapshot = g.clone();
        let _ = toggle_completion(&g, ts(2024, 6, 1, 9)).unwrap();
        assert_eq!(g, snapshot);
    }

    #[test]
    fn test_now_before_creation_rejected() {
        let g = goal(GoalType::Daily, ts(2024, 6, 10, 8));
        let snapshot = g.clone();
        let err = toggle_completion(&g, ts(2024, 6, 10, 7)).unwrap_err();

        assert!(matches!(err, GoalError::InvalidArgument(_)));
        assert_eq!(g, snapshot);
    }

    #[test]
    fn test_now_before_last_completion_rejected() {
        let g = goal(GoalType::Daily, ts(2024, 6, 1, 8));
        let done = toggle_completion(&g, ts(2024, 6, 3, 9)).unwrap();
        let undone = toggle_completion(&done, ts(2024, 6, 3, 10)).unwrap();
        let err = toggle_completion(&undone, ts(2024, 6, 2, 9)).unwrap_err();
        assert!(matches!(err, GoalError::InvalidArgument(_)));
    }

    #[test]
    fn test_out_of_order_history_rejected() {
        let mut g = goal(GoalType::Daily, ts(2024, 6, 1, 8));
        g.completion_history = vec![ts(2024, 6, 5, 9), ts(2024, 6, 3, 9)];
        let err = toggle_completion(&g, ts(2024, 6, 6, 9)).unwrap_err();
        assert!(matches!(err, GoalError::InvalidArgument(_)));
        assert!(check_history(&g).is_err());
    }

    #[test]
    fn test_streak_grows_over_consecutive_days() {
        let mut g = goal(GoalType::Daily, ts(2024, 6, 1, 8));
        for day in 1..=3 {
            g = roll_over(&g, ts(2024, 6, day, 9)).unwrap();
            g = toggle_completion(&g, ts(2024, 6, day, 9)).unwrap();
        }
        assert_eq!(g.streak, 3);

        // Skip the 4th; completing on the 5th starts over.
        g = roll_over(&g, ts(2024, 6, 5, 9)).unwrap();
        assert!(!g.completed);
        g = toggle_completion(&g, ts(2024, 6, 5, 9)).unwrap();
        assert_eq!(g.streak, 1);
        assert_eq!(g.completion_history.len(), 4);
    }

    #[test]
    fn test_streak_field_ignores_tampered_value() {
        let mut g = goal(GoalType::Daily, ts(2024, 6, 1, 8));
        g.streak = 42;
        let done = toggle_completion(&g, ts(2024, 6, 1, 9)).unwrap();
        assert_eq!(done.streak, 1);
    }

    #[test]
    fn test_roll_over_same_period_keeps_completed() {
        let g = goal(GoalType::Weekly, ts(2024, 6, 9, 8));
        let done = toggle_completion(&g, ts(2024, 6, 10, 9)).unwrap();
        let rolled = roll_over(&done, ts(2024, 6, 15, 20)).unwrap();
        assert!(rolled.completed);
        assert_eq!(rolled, done);
        assert_eq!(rolled.version, done.version);
    }

    #[test]
    fn test_roll_over_new_period_clears_flag() {
        let g = goal(GoalType::Weekly, ts(2024, 6, 9, 8));
        let done = toggle_completion(&g, ts(2024, 6, 10, 9)).unwrap();
        let rolled = roll_over(&done, ts(2024, 6, 16, 9)).unwrap();
        assert!(!rolled.completed);
        assert_eq!(rolled.completion_history, done.completion_history);
        assert_eq!(rolled.streak, 1);
        assert_eq!(rolled.updated_at, ts(2024, 6, 16, 9));
    }

    #[test]
    fn test_roll_over_rejects_early_now() {
        let g = goal(GoalType::Daily, ts(2024, 6, 9, 8));
        assert!(roll_over(&g, ts(2024, 6, 8, 8)).is_err());
    }

    #[test]
    fn test_is_overdue() {
        let g = goal(GoalType::Daily, ts(2024, 6, 9, 8));
        assert!(!is_overdue(&g, ts(2024, 6, 10, 8)));
        assert!(is_overdue(&g, ts(2024, 6, 10, 9)));

        let done = toggle_completion(&g, ts(2024, 6, 9, 12)).unwrap();
        assert!(!is_overdue(&done, ts(2024, 6, 12, 9)));
    }

    #[test]
    fn test_apply_patch() {
        let g = goal(GoalType::Daily, ts(2024, 6, 9, 8));
        let patch = GoalPatch {
            title: Some("  Three problems ".to_string()),
            description: None,
        };
        let edited = apply_patch(&g, &patch, ts(2024, 6, 9, 9)).unwrap();
        assert_eq!(edited.title, "Three problems");
        assert_eq!(edited.description, g.description);
        assert_eq!(edited.goal_type, g.goal_type);
        assert_eq!(edited.deadline, g.deadline);
        assert_eq!(edited.updated_at, ts(2024, 6, 9, 9));
    }

    #[test]
    fn test_apply_patch_rejects_blank_title() {
        let g = goal(GoalType::Daily, ts(2024, 6, 9, 8));
        let patch = GoalPatch {
            title: Some(String::new()),
            description: None,
        };
        let err = apply_patch(&g, &patch, ts(2024, 6, 9, 9)).unwrap_err();
        assert!(matches!(err, GoalError::Validation(_)));
    }
}
