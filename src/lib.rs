//! # Sypher
//!
//! Goal and streak tracking for developers.
//!
//! Users define daily or weekly goals, mark them complete, and Sypher keeps
//! a completion history and the current run of consecutive completed
//! periods. The tracking rules live in [`sypher_core`]; this crate adds
//! SQLite persistence, configuration, logging and the `sypher` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌─────────────┐   ┌──────────┐
//! │   CLI    │──▶│ GoalService  │──▶│ Goal Engine │   │  SQLite  │
//! │ (sypher) │   │ load/CAS/log │   │ (pure)      │   │  goals   │
//! └──────────┘   └──────┬───────┘   └─────────────┘   └────▲─────┘
//!                       └──────────── GoalStore ───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! sypher init
//! sypher goal create --user alice --title "One LeetCode problem" --type daily
//! sypher goal list --user alice
//! sypher goal toggle <id>
//! sypher stats --user alice
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | tracing subscriber setup |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite `GoalStore` |
//! | [`service`] | Load, transform, compare-and-swap |
//! | [`goals`] | `sypher goal …` commands |
//! | [`stats`] | Per-user summary |
//! | [`export`] | JSON export |

pub mod config;
pub mod db;
pub mod export;
pub mod goals;
pub mod logging;
pub mod migrate;
pub mod service;
pub mod sqlite_store;
pub mod stats;
