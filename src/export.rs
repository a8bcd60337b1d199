//! Export a user's goals as JSON.
//!
//! Produces a document with every goal, its completion history and the
//! derived streak fields, suitable for backups or feeding a dashboard.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::config::Config;
use crate::goals::{open_service, GoalView};

#[derive(Serialize)]
struct ExportData {
    user_id: String,
    exported_at: DateTime<Utc>,
    goals: Vec<GoalView>,
}

/// Export goals as JSON.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub async fn run_export(config: &Config, user_id: &str, output: Option<&Path>) -> Result<()> {
    let (service, store) = open_service(config).await?;
    let goals = service.list_goals(user_id).await;
    store.close().await;
    let goals = goals?;

    let now = service.now();
    let data = ExportData {
        user_id: user_id.to_string(),
        exported_at: now,
        goals: goals.into_iter().map(|g| GoalView::new(g, now)).collect(),
    };
    let goal_count = data.goals.len();
    let json = serde_json::to_string_pretty(&data)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)?;
            eprintln!("Exported {} goals to {}", goal_count, path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
