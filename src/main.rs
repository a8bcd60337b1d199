//! # Sypher CLI (`sypher`)
//!
//! Track daily and weekly goals and their streaks from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! sypher --config ./config/sypher.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sypher init` | Create the SQLite database and run schema migrations |
//! | `sypher goal create` | Create a daily or weekly goal |
//! | `sypher goal list` | List a user's goals |
//! | `sypher goal show <id>` | Show one goal with its completion history |
//! | `sypher goal toggle <id>` | Mark a goal complete or incomplete |
//! | `sypher goal edit <id>` | Change a goal's title or description |
//! | `sypher goal delete <id>` | Delete a goal |
//! | `sypher stats` | Summarize a user's progress |
//! | `sypher export` | Write a user's goals as JSON |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sypher::{config, export, goals, logging, migrate, stats};
use sypher_core::models::GoalType;

/// Sypher CLI: goal and streak tracking for developers.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file with the database path and logging settings.
#[derive(Parser)]
#[command(
    name = "sypher",
    about = "Sypher: goal and streak tracking for developers",
    version,
    long_about = "Sypher keeps daily and weekly goals in a local SQLite database, records \
    every completion, and tracks the current run of consecutive completed days or weeks."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/sypher.toml`.
    #[arg(long, global = true, default_value = "./config/sypher.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the goals table. Running it
    /// again is safe.
    Init,

    /// Create, inspect, complete and delete goals.
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Summarize a user's goals and streaks.
    Stats {
        /// User identifier.
        #[arg(long)]
        user: String,
    },

    /// Export a user's goals as JSON.
    Export {
        /// User identifier.
        #[arg(long)]
        user: String,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Goal subcommands.
#[derive(Subcommand)]
enum GoalAction {
    /// Create a new goal.
    ///
    /// The deadline is set one day (daily) or seven days (weekly) after
    /// creation.
    Create {
        /// Owning user identifier.
        #[arg(long)]
        user: String,

        /// Goal title.
        #[arg(long)]
        title: String,

        /// Optional longer description.
        #[arg(long)]
        description: Option<String>,

        /// Cadence: `daily` or `weekly`.
        #[arg(long = "type", default_value = "daily")]
        goal_type: GoalType,
    },

    /// List a user's goals.
    List {
        /// User identifier.
        #[arg(long)]
        user: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show a goal with its completion history.
    Show {
        /// Goal id.
        id: String,
    },

    /// Toggle completion for the current period.
    ///
    /// Completing records a timestamp in the history; un-completing keeps
    /// the history and only clears the flag.
    Toggle {
        /// Goal id.
        id: String,
    },

    /// Edit a goal's title or description.
    Edit {
        /// Goal id.
        id: String,

        /// New title.
        #[arg(long)]
        title: Option<String>,

        /// New description.
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a goal permanently.
    Delete {
        /// Goal id.
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)?;
    logging::init_tracing(&cfg.log);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Goal { action } => match action {
            GoalAction::Create {
                user,
                title,
                description,
                goal_type,
            } => {
                goals::run_create(&cfg, &user, &title, description, goal_type).await?;
            }
            GoalAction::List { user, json } => {
                goals::run_list(&cfg, &user, json).await?;
            }
            GoalAction::Show { id } => {
                goals::run_show(&cfg, &id).await?;
            }
            GoalAction::Toggle { id } => {
                goals::run_toggle(&cfg, &id).await?;
            }
            GoalAction::Edit {
                id,
                title,
                description,
            } => {
                goals::run_edit(&cfg, &id, title, description).await?;
            }
            GoalAction::Delete { id } => {
                goals::run_delete(&cfg, &id).await?;
            }
        },
        Commands::Stats { user } => {
            stats::run_stats(&cfg, &user).await?;
        }
        Commands::Export { user, output } => {
            export::run_export(&cfg, &user, output.as_deref()).await?;
        }
    }

    Ok(())
}
