//! Adapter module - runs a duel on tokio and records what happens
//!
//! The core [`Match`](crate::core::Match) is synchronous and time-free. This
//! crate puts it on a clock:
//!
//! - [`runtime`]: a single scheduler task that serializes ticks and player
//!   actions, publishes snapshots over a `watch` channel, and stops on demand
//! - [`config`]: `TETRIS_DUEL_*` environment configuration
//! - [`log`]: optional JSON-lines event log
//!
//! # Environment Variables
//!
//! - `TETRIS_DUEL_SEED`: player seed, the opponent uses `seed + 1` (default: 1)
//! - `TETRIS_DUEL_TICK_MS`: scheduler period (default: 50)
//! - `TETRIS_DUEL_DROP_MS`: gravity interval (default: 800)
//! - `TETRIS_DUEL_THINK_MS`: opponent think interval (default: 350)
//! - `TETRIS_DUEL_LOG_PATH`: append match events here as JSON lines
//!
//! # Event Log Format
//!
//! ```text
//! {"type":"start","ts":0,"episode":1}
//! {"type":"merge","ts":2450,"episode":1,"side":"player","cleared_rows":[18,19],"score_gained":200,"garbage_sent":1}
//! {"type":"garbage","ts":2450,"episode":1,"side":"opponent","count":1,"truncated_rows":0}
//! {"type":"game_over","ts":91200,"episode":1,"winner":"opponent"}
//! ```

pub mod config;
pub mod log;
pub mod runtime;

pub use tetris_duel_core as core;
pub use tetris_duel_engine as engine;
pub use tetris_duel_types as types;

pub use config::DuelConfig;
pub use log::{EventLog, EventRecord};
pub use runtime::{spawn_match, spawn_match_with, DriverCommand, DriverHandle, DriverReport, MatchDriver};
