use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate_pool(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the schema on an open pool. Idempotent.
pub async fn migrate_pool(pool: &SqlitePool) -> Result<()> {
    // Timestamps are Unix milliseconds; history is a JSON array of them.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS goals (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            goal_type TEXT NOT NULL,
            deadline INTEGER NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            completion_history_json TEXT NOT NULL DEFAULT '[]',
            streak INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Databases created before versioned updates lack the column.
    let has_version: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM pragma_table_info('goals') WHERE name = 'version'",
    )
    .fetch_one(pool)
    .await?;
    if !has_version {
        sqlx::query("ALTER TABLE goals ADD COLUMN version INTEGER NOT NULL DEFAULT 0")
            .execute(pool)
            .await?;
        tracing::info!("added version column to goals");
    }

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_goals_user_id ON goals(user_id)")
        .execute(pool)
        .await?;

    tracing::info!("schema migrations applied");
    Ok(())
}
