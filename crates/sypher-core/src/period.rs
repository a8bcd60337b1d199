//! Period keys for streak counting.
//!
//! All period boundaries are computed in UTC so the same history yields the
//! same streak regardless of where the process runs.
//!
//! | Cadence | Key | Predecessor |
//! |---------|-----|-------------|
//! | daily | UTC calendar date | previous date |
//! | weekly | `(year, week)` | `(year, week - 1)`, or the last week of the previous year (a split New Year week is two periods) |
//!
//! Week numbers use `ceil((day_of_year + jan1_weekday) / 7)` with
//! `day_of_year` 1-based and `jan1_weekday` counted from Sunday = 0, so
//! weeks start on Sunday. Weeks are numbered per year: a Sunday-to-Saturday
//! span that crosses New Year yields two keys, `(y, last)` and `(y + 1, 1)`,
//! which are adjacent for streak purposes.
//!
//! Unless Dec 31 is a Saturday, that split adds a short extra period. A
//! weekly streak survives New Year only if both halves have a completion:
//! completing once per calendar week (say every Tuesday) resets the streak
//! to 1 in the first full week of January.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::models::GoalType;

/// Identifies one streak-counting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
}

impl PeriodKey {
    /// The period immediately before this one.
    ///
    /// Returns `None` only at the edge of the representable calendar.
    pub fn predecessor(&self) -> Option<PeriodKey> {
        match *self {
            PeriodKey::Day(date) => date.pred_opt().map(PeriodKey::Day),
            PeriodKey::Week { year, week } if week > 1 => Some(PeriodKey::Week {
                year,
                week: week - 1,
            }),
            PeriodKey::Week { year, .. } => {
                let dec31 = NaiveDate::from_ymd_opt(year - 1, 12, 31)?;
                Some(PeriodKey::Week {
                    year: year - 1,
                    week: week_number(dec31),
                })
            }
        }
    }
}

/// Week-of-year for `date`, with weeks starting on Sunday.
pub fn week_number(date: NaiveDate) -> u32 {
    let ordinal = date.ordinal();
    let weekday = date.weekday().num_days_from_sunday();
    // Weekday of January 1st, derived from the date's own weekday.
    let jan1_weekday = (weekday + 7 - (date.ordinal0() % 7)) % 7;
    (ordinal + jan1_weekday + 6) / 7
}

/// Period containing `ts` for the given cadence.
pub fn period_of(goal_type: GoalType, ts: DateTime<Utc>) -> PeriodKey {
    let date = ts.date_naive();
    match goal_type {
        GoalType::Daily => PeriodKey::Day(date),
        GoalType::Weekly => PeriodKey::Week {
            year: date.year(),
            week: week_number(date),
        },
    }
}
