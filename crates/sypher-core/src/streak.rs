//! Streak calculation over a completion history.
//!
//! A streak is the number of consecutive periods, ending at the period of
//! the most recent completion, that contain at least one completion.
//! Several completions in one period count once.

use chrono::{DateTime, Utc};

use crate::models::GoalType;
use crate::period::{period_of, PeriodKey};

/// Count consecutive completed periods, walking back from the most recent
/// completion until the first gap.
///
/// Accepts the history in any order.
pub fn calculate_streak(goal_type: GoalType, history: &[DateTime<Utc>]) -> u32 {
    let mut keys: Vec<PeriodKey> = history.iter().map(|ts| period_of(goal_type, *ts)).collect();
    keys.sort_unstable_by(|a, b| b.cmp(a));
    keys.dedup();

    let mut keys = keys.into_iter();
    let Some(mut cursor) = keys.next() else {
        return 0;
    };

    let mut streak = 1;
    for key in keys {
        match cursor.predecessor() {
            Some(prev) if prev == key => {
                streak += 1;
                cursor = key;
            }
            _ => break,
        }
    }
    streak
}

/// Streak as seen at `now`.
///
/// Same as [`calculate_streak`] while the most recent completion is in the
/// current period or the one right before it. Once a full period passes
/// without a completion the streak has lapsed and this returns 0.
pub fn live_streak(goal_type: GoalType, history: &[DateTime<Utc>], now: DateTime<Utc>) -> u32 {
    let Some(last) = history.iter().max() else {
        return 0;
    };
    let current = period_of(goal_type, now);
    let last_key = period_of(goal_type, *last);

    if last_key >= current || current.predecessor() == Some(last_key) {
        calculate_streak(goal_type, history)
    } else {
        0
    }
}
