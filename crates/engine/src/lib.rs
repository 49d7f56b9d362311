//! Opponent decision logic layered on top of the core rules.
//!
//! - [`heuristic`]: board evaluation and the one-ply best-placement search
//! - [`place`]: targeted placement (rotate, shift, hard drop) with typed errors
//!
//! The unit control step that walks a live piece toward a placement belongs to
//! the session and is re-exported here for convenience.

pub mod heuristic;
pub mod place;

pub use tetris_duel_core::{control_action, ControlHint, ControlStep, Placement};
pub use tetris_duel_types as types;

pub use heuristic::{best_move, best_move_with, evaluate, Heuristic, StackFeatures, Weights};
pub use place::{apply_place, PlaceError};
