//! Core types module - shared data structures and constants
//!
//! This module defines the vocabulary shared by every crate in the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! from the deterministic core, the heuristic engine, the terminal frontend
//! and the async driver alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn anchor**: (3, 0), the top-left corner of the piece's matrix
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds and are measured against an externally
//! supplied `now` rather than the wall clock:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SCHEDULER_TICK_MS` | 50 | Period at which the driver calls `Match::tick` |
//! | `DROP_INTERVAL_MS` | 800 | Gravity interval for both boards |
//! | `THINK_INTERVAL_MS` | 350 | Opponent decision/control interval |
//! | `CLEAR_FLASH_MS` | 300 | How long cleared rows stay flagged |
//! | `EFFECT_MS` | 500 | How long attack flags stay raised |
//!
//! # Examples
//!
//! ```
//! use tetris_duel_types::{Action, Cell, PieceKind, Side, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Action::from_str("hardDrop"), Some(Action::HardDrop));
//! assert_eq!(Side::Player.opponent(), Side::Opponent);
//! assert!(Cell::Garbage.is_occupied());
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn anchor column (top-left of the piece matrix)
pub const SPAWN_X: i8 = 3;

/// Spawn anchor row
pub const SPAWN_Y: i8 = 0;

/// Number of piece kinds in the catalog
pub const PIECE_KIND_COUNT: usize = 7;

/// Minimum queue length kept ahead of every draw
pub const QUEUE_LOOKAHEAD: usize = 5;

/// Period at which the scheduler calls into the match (50ms)
pub const SCHEDULER_TICK_MS: u32 = 50;

/// Gravity interval for both boards (800ms per row)
pub const DROP_INTERVAL_MS: u32 = 800;

/// Opponent think/control interval (350ms)
pub const THINK_INTERVAL_MS: u32 = 350;

/// Duration cleared rows stay flagged for animation (300ms)
pub const CLEAR_FLASH_MS: u32 = 300;

/// Duration of the attack-launch / attacked flags (500ms)
pub const EFFECT_MS: u32 = 500;

/// Points for clearing four rows at once
pub const FOUR_LINE_SCORE: u64 = 800;

/// Points per row for any other clear
pub const LINE_SCORE: u64 = 100;

/// Garbage rows sent for a four-row clear
pub const FOUR_LINE_GARBAGE: u8 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duel_timing_defaults() {
        assert_eq!(SCHEDULER_TICK_MS, 50);
        assert_eq!(DROP_INTERVAL_MS, 800);
        assert_eq!(THINK_INTERVAL_MS, 350);
        assert_eq!(CLEAR_FLASH_MS, 300);
        assert_eq!(EFFECT_MS, 500);
        assert!(THINK_INTERVAL_MS < DROP_INTERVAL_MS);
    }

    #[test]
    fn cell_occupancy() {
        assert!(!Cell::Empty.is_occupied());
        assert!(Cell::Filled(PieceKind::I).is_occupied());
        assert!(Cell::Garbage.is_occupied());
        assert_eq!(Cell::default(), Cell::Empty);
    }

    #[test]
    fn action_round_trips_through_names() {
        for action in Action::ALL {
            assert_eq!(Action::from_str(action.as_str()), Some(action));
        }
        assert_eq!(Action::from_str("drop"), Some(Action::HardDrop));
        assert_eq!(Action::from_str("jump"), None);
    }
}

/// The seven piece kinds
///
/// - **I**: 4-long bar
/// - **O**: 2x2 square (single orientation)
/// - **T**: T-shaped
/// - **S**: S-shaped
/// - **Z**: Z-shaped (mirror of S)
/// - **J**: J-shaped
/// - **L**: L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in catalog order (the order a fresh bag starts from before shuffling).
    pub const ALL: [PieceKind; PIECE_KIND_COUNT] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_duel_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Position in [`PieceKind::ALL`].
    pub fn index(&self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }
}

/// A cell on the game board
///
/// Occupancy is written only by merging a landed piece or by garbage injection;
/// movement never touches the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Left behind by a merged piece of this kind.
    Filled(PieceKind),
    /// Part of a garbage row sent by the other board.
    Garbage,
}

impl Cell {
    /// Any non-empty tag counts, garbage included.
    pub fn is_occupied(&self) -> bool {
        !matches!(self, Cell::Empty)
    }
}

/// Which of the two boards in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Human-controlled board
    Player,
    /// Heuristic-controlled board
    Opponent,
}

impl Side {
    pub fn opponent(&self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Opponent => "opponent",
        }
    }
}

/// Discrete actions a board accepts from its controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Shift one column left
    Left,
    /// Shift one column right
    Right,
    /// Move down one row (no lock when blocked)
    Down,
    /// Advance to the next orientation; rejected on collision, no kicks
    Rotate,
    /// Drop to the resting row and merge immediately
    HardDrop,
    /// Swap the active piece with the held kind
    Hold,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Left,
        Action::Right,
        Action::Down,
        Action::Rotate,
        Action::HardDrop,
        Action::Hold,
    ];

    /// Parse action from its camelCase name
    ///
    /// `"drop"` is accepted as an alias for `hardDrop`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Action::Left),
            "right" => Some(Action::Right),
            "down" => Some(Action::Down),
            "rotate" => Some(Action::Rotate),
            "hardDrop" | "drop" => Some(Action::HardDrop),
            "hold" => Some(Action::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Down => "down",
            Action::Rotate => "rotate",
            Action::HardDrop => "hardDrop",
            Action::Hold => "hold",
        }
    }
}

/// Cosmetic attack flag raised on a board after a multi-row clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// This board just sent garbage.
    AttackLaunch,
    /// This board just received garbage.
    Attacked,
}
