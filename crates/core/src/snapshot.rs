//! Read-only views of sessions and matches for renderers and observers.

use crate::board::{Board, ClearedRows};
use crate::pieces::Piece;
use crate::rng::Preview;
use crate::types::{Effect, PieceKind, Side};

use crate::duel::Phase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub board: Board,
    pub active: Option<Piece>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    /// Up to five upcoming kinds after `next`.
    pub queue: Preview,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub score: u64,
    pub lines: u32,
    /// Rows flagged as just cleared.
    pub clearing: ClearedRows,
    pub effect: Option<Effect>,
    pub topped_out: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: Board::new(),
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            queue: Preview::new(),
            hold: None,
            can_hold: true,
            score: 0,
            lines: 0,
            clearing: ClearedRows::new(),
            effect: None,
            topped_out: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchSnapshot {
    pub phase: Phase,
    pub winner: Option<Side>,
    /// Increments on every start/restart.
    pub episode: u32,
    pub player: SessionSnapshot,
    pub opponent: SessionSnapshot,
}

impl MatchSnapshot {
    pub fn side(&self, side: Side) -> &SessionSnapshot {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Running
    }
}
