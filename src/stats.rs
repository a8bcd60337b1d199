//! Per-user progress overview.
//!
//! Summarizes a user's goals: how many are daily or weekly, how many are
//! done for the current period, which are overdue, and where the streaks
//! stand. Used by `sypher stats`.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::goals::open_service;

/// Run the stats command: load the user's goals and print a summary.
pub async fn run_stats(config: &Config, user_id: &str) -> Result<()> {
    let (service, store) = open_service(config).await?;
    let summary = service.summarize(user_id).await;
    let goals = service.list_goals(user_id).await;
    store.close().await;
    let summary = summary?;
    let goals = goals?;
    let now = service.now();

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Sypher: Goal Stats");
    println!("=================");
    println!();
    println!("  Database:     {}", config.db.path.display());
    println!("  Size:         {}", format_bytes(db_size));
    println!("  User:         {}", summary.user_id);
    println!();
    println!(
        "  Goals:        {} ({} daily, {} weekly)",
        summary.total, summary.daily, summary.weekly
    );
    println!(
        "  Completed:    {} / {} ({}%)",
        summary.completed,
        summary.total,
        if summary.total > 0 {
            (summary.completed * 100) / summary.total
        } else {
            0
        }
    );
    println!("  Overdue:      {}", summary.overdue);
    println!("  Completions:  {}", summary.total_completions);
    println!("  Best streak:  {}", summary.best_streak);
    println!("  Active:       {}", summary.active_streaks);

    if !goals.is_empty() {
        println!();
        println!("  By goal:");
        println!(
            "  {:<32} {:<6} {:>6} {:>11}   {}",
            "TITLE", "TYPE", "STREAK", "COMPLETIONS", "LAST DONE"
        );
        println!("  {}", "-".repeat(76));

        for goal in &goals {
            let last = match goal.last_completion() {
                Some(ts) => format_ts_relative(ts, now),
                None => "never".to_string(),
            };
            println!(
                "  {:<32} {:<6} {:>6} {:>11}   {}",
                truncate(&goal.title, 32),
                goal.goal_type,
                goal.streak,
                goal.completion_history.len(),
                last
            );
        }
    }

    println!();
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Format a timestamp relative to `now` (e.g. "3 hours ago").
fn format_ts_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (now - ts).num_seconds();

    if delta < 0 {
        return ts.format("%Y-%m-%d %H:%M").to_string();
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        ts.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_format_ts_relative() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(format_ts_relative(now, now), "just now");
        assert_eq!(format_ts_relative(now - Duration::minutes(1), now), "1 min ago");
        assert_eq!(format_ts_relative(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_ts_relative(now - Duration::days(2), now), "2 days ago");
        assert_eq!(
            format_ts_relative(now - Duration::days(40), now),
            "2024-05-01 12:00"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 32), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
