//! # Sypher Core
//!
//! Goal tracking logic for Sypher: the [`Goal`](models::Goal) model,
//! period keys, streak calculation, the pure goal engine, and the
//! [`GoalStore`](store::GoalStore) abstraction with an in-memory backend.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. Persistence
//! backends and the CLI live in the `sypher` crate.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | `Goal`, `GoalType`, `NewGoal`, `GoalPatch` |
//! | [`period`] | UTC day and week keys |
//! | [`streak`] | Consecutive-period streak counting |
//! | [`engine`] | Completion toggling and period roll-over |
//! | [`clock`] | Injected time source |
//! | [`store`] | Store trait and in-memory implementation |
//! | [`error`] | `GoalError` taxonomy |

pub mod clock;
pub mod engine;
pub mod error;
pub mod models;
pub mod period;
pub mod store;
pub mod streak;
