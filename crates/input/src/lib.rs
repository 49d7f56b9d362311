//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::Action`]. Every press is
//! one discrete action; there is no auto-repeat handling beyond what the
//! terminal itself sends.

pub mod map;

pub use tetris_duel_types as types;

pub use map::{handle_key_event, is_restart, should_quit};
