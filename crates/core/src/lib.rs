//! Core duel logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the two-board duel: the board grid, the piece
//! catalog, the per-board session, and the match controller that trades
//! garbage between the boards. It has no UI, terminal or async dependencies.
//!
//! - **Deterministic**: time only enters through `now_ms` arguments and every
//!   board draws from its own seeded LCG, so a seed replays a match exactly
//! - **Isolated**: a session never touches the other board; attacks are
//!   returned as [`InjectGarbage`] commands and applied by [`Match`]
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision, merge, sweep and garbage injection
//! - [`pieces`]: piece catalog (orientation tables) and the active-piece value
//! - [`rng`]: seeded LCG and the bag queue with five-piece lookahead
//! - [`scoring`]: score and garbage tables
//! - [`session`]: one board's state, hold, merge pipeline and control steps
//! - [`duel`]: the match controller and its scheduler
//! - [`snapshot`]: read-only views for renderers
//!
//! # Example
//!
//! ```
//! use tetris_duel_core::{Board, Match, MatchConfig, Phase, Piece, Placement};
//! use tetris_duel_core::types::{Action, Side};
//!
//! fn stay_put(_: &Piece, _: &Board) -> Option<Placement> {
//!     None
//! }
//!
//! let mut duel = Match::new(MatchConfig::with_seed(7), stay_put);
//! duel.start(0);
//! duel.apply_action(Side::Player, Action::HardDrop, 10);
//! duel.tick(900);
//!
//! assert_eq!(duel.phase(), Phase::Running);
//! assert_eq!(duel.session(Side::Player).pieces_merged(), 1);
//! ```

pub mod board;
pub mod duel;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tetris_duel_types as types;

pub use board::{Board, ClearedRows, Row};
pub use duel::{
    Match, MatchConfig, MatchEvent, MatchEvents, MovePlanner, Phase, Scheduler, SideClock,
};
pub use pieces::{get_shape, orientation_count, piece_def, Piece, PieceDef, PieceShape, CATALOG};
pub use rng::{PieceQueue, Preview, SimpleRng};
pub use scoring::{garbage_for_clear, line_clear_score};
pub use session::{
    control_action, ControlHint, ControlStep, InjectGarbage, MergeReport, Placement, Session,
    SessionEvent,
};
pub use snapshot::{MatchSnapshot, SessionSnapshot};
