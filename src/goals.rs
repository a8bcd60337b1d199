//! `sypher goal …` commands.
//!
//! Each command opens the configured SQLite database, runs one
//! [`GoalService`] operation, and prints the result to stdout.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use sypher_core::clock::SystemClock;
use sypher_core::engine::is_overdue;
use sypher_core::models::{Goal, GoalPatch, GoalType, NewGoal};
use sypher_core::streak::live_streak;

use crate::config::Config;
use crate::db;
use crate::service::GoalService;
use crate::sqlite_store::SqliteStore;

/// Goal view with derived fields, used for `--json` output and `export`.
#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub live_streak: u32,
    pub overdue: bool,
}

impl GoalView {
    pub fn new(goal: Goal, now: DateTime<Utc>) -> Self {
        Self {
            live_streak: live_streak(goal.goal_type, &goal.completion_history, now),
            overdue: is_overdue(&goal, now),
            goal,
        }
    }
}

/// Open the database and build a service on the system clock.
pub async fn open_service(config: &Config) -> Result<(GoalService, Arc<SqliteStore>)> {
    let pool = db::connect(config).await?;
    let store = Arc::new(SqliteStore::new(pool));
    let service = GoalService::new(store.clone(), Arc::new(SystemClock));
    Ok((service, store))
}

pub async fn run_create(
    config: &Config,
    user_id: &str,
    title: &str,
    description: Option<String>,
    goal_type: GoalType,
) -> Result<()> {
    let (service, store) = open_service(config).await?;
    let goal = service
        .create_goal(NewGoal {
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: description.unwrap_or_default(),
            goal_type,
        })
        .await;
    store.close().await;
    let goal = goal?;

    println!("created goal: {}", goal.id);
    println!("  type:      {}", goal.goal_type);
    println!("  deadline:  {}", format_ts_iso(goal.deadline));
    Ok(())
}

pub async fn run_list(config: &Config, user_id: &str, json: bool) -> Result<()> {
    let (service, store) = open_service(config).await?;
    let goals = service.list_goals(user_id).await;
    store.close().await;
    let goals = goals?;
    let now = service.now();

    if json {
        let views: Vec<GoalView> = goals.into_iter().map(|g| GoalView::new(g, now)).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if goals.is_empty() {
        println!("No goals for user {}.", user_id);
        return Ok(());
    }

    println!(
        "{:<36}  {:<6}  {:<4}  {:>6}  {:<10}  TITLE",
        "ID", "TYPE", "DONE", "STREAK", "DUE"
    );
    for goal in &goals {
        let due = if is_overdue(goal, now) {
            "overdue".to_string()
        } else {
            goal.deadline.format("%Y-%m-%d").to_string()
        };
        println!(
            "{:<36}  {:<6}  {:<4}  {:>6}  {:<10}  {}",
            goal.id,
            goal.goal_type,
            if goal.completed { "yes" } else { "no" },
            goal.streak,
            due,
            goal.title
        );
    }
    Ok(())
}

pub async fn run_show(config: &Config, id: &str) -> Result<()> {
    let (service, store) = open_service(config).await?;
    let goal = service.view_goal(id).await;
    store.close().await;
    let view = GoalView::new(goal?, service.now());
    let goal = &view.goal;

    println!("--- Goal ---");
    println!("id:           {}", goal.id);
    println!("title:        {}", goal.title);
    println!("user:         {}", goal.user_id);
    println!("type:         {}", goal.goal_type);
    if !goal.description.is_empty() {
        println!("description:  {}", goal.description);
    }
    println!(
        "deadline:     {}{}",
        format_ts_iso(goal.deadline),
        if view.overdue { " (overdue)" } else { "" }
    );
    println!("completed:    {}", goal.completed);
    println!(
        "streak:       {} {}{}",
        goal.streak,
        goal.goal_type.unit(),
        if goal.streak == 1 { "" } else { "s" }
    );
    println!("live streak:  {}", view.live_streak);
    println!("created_at:   {}", format_ts_iso(goal.created_at));
    println!("updated_at:   {}", format_ts_iso(goal.updated_at));
    println!();

    println!("--- Completions ({}) ---", goal.completion_history.len());
    for ts in goal.completion_history.iter().rev() {
        println!("{}", format_ts_iso(*ts));
    }

    Ok(())
}

pub async fn run_toggle(config: &Config, id: &str) -> Result<()> {
    let (service, store) = open_service(config).await?;
    let goal = service.toggle_goal(id).await;
    store.close().await;
    let goal = goal?;

    println!(
        "{}: {} (streak: {})",
        goal.title,
        if goal.completed { "completed" } else { "not completed" },
        goal.streak
    );
    Ok(())
}

pub async fn run_edit(
    config: &Config,
    id: &str,
    title: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let (service, store) = open_service(config).await?;
    let goal = service.edit_goal(id, GoalPatch { title, description }).await;
    store.close().await;
    let goal = goal?;

    println!("updated goal: {}", goal.id);
    println!("  title:        {}", goal.title);
    println!("  description:  {}", goal.description);
    Ok(())
}

pub async fn run_delete(config: &Config, id: &str) -> Result<()> {
    let (service, store) = open_service(config).await?;
    let result = service.delete_goal(id).await;
    store.close().await;
    result?;

    println!("deleted goal: {}", id);
    Ok(())
}

pub(crate) fn format_ts_iso(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
