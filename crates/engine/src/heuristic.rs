//! Heuristic move selector
//!
//! One-ply search: every orientation of the live piece is tried in every
//! column where it fits at the spawn row, dropped onto a scratch copy of the
//! board, and the resulting stack is scored. Lower scores are better.

use tetris_duel_core::pieces::orientation_count;
use tetris_duel_core::{Board, MovePlanner, Piece, Placement};

use crate::types::{BOARD_WIDTH, SPAWN_Y};

/// Stack features the evaluation is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackFeatures {
    pub total_height: u32,
    pub holes: u32,
    pub bumpiness: u32,
}

impl StackFeatures {
    pub fn of(board: &Board) -> Self {
        let heights = board.column_heights();
        let bumpiness = heights
            .windows(2)
            .map(|w| w[0].abs_diff(w[1]) as u32)
            .sum();

        Self {
            total_height: heights.iter().map(|&h| h as u32).sum(),
            holes: board.holes(),
            bumpiness,
        }
    }
}

/// Linear weights over [`StackFeatures`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub height: f64,
    pub holes: f64,
    pub bumpiness: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            height: 0.5,
            holes: 0.4,
            bumpiness: 0.1,
        }
    }
}

impl Weights {
    pub fn score(&self, f: StackFeatures) -> f64 {
        self.height * f.total_height as f64
            + self.holes * f.holes as f64
            + self.bumpiness * f.bumpiness as f64
    }
}

/// Score a board with the default weights (lower is better)
pub fn evaluate(board: &Board) -> f64 {
    Weights::default().score(StackFeatures::of(board))
}

/// Anchor columns worth trying for one orientation
///
/// Covers exactly the anchors whose cells stay inside the side walls.
fn anchor_range(piece: &Piece) -> Option<std::ops::RangeInclusive<i8>> {
    let (min, max) = piece.column_span()?;
    Some(-min..=(BOARD_WIDTH as i8 - 1 - max))
}

/// Best placement for `piece` on `board` under `weights`
///
/// Ties keep the first candidate found: lowest orientation, then lowest
/// column. Returns `None` only when no orientation fits anywhere at spawn.
pub fn best_move_with(piece: &Piece, board: &Board, weights: &Weights) -> Option<Placement> {
    let mut scratch = Board::new();
    let mut best: Option<(f64, Placement)> = None;

    for orientation in 0..orientation_count(piece.kind) {
        let probe = Piece::at(piece.kind, orientation, 0, SPAWN_Y);
        let Some(range) = anchor_range(&probe) else {
            continue;
        };

        for x in range {
            let candidate = Piece::at(piece.kind, orientation, x, SPAWN_Y);
            if board.collides(&candidate, 0, 0) {
                continue;
            }

            let dy = board.hard_drop_offset(&candidate);
            scratch.clone_from(board);
            scratch.merge(&candidate.shifted(0, dy));
            let score = weights.score(StackFeatures::of(&scratch));

            if best.map_or(true, |(s, _)| score < s) {
                best = Some((score, Placement { x, orientation }));
            }
        }
    }

    best.map(|(_, placement)| placement)
}

/// Best placement with the default weights
pub fn best_move(piece: &Piece, board: &Board) -> Option<Placement> {
    best_move_with(piece, board, &Weights::default())
}

/// The heuristic opponent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Heuristic {
    pub weights: Weights,
}

impl Heuristic {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }
}

impl MovePlanner for Heuristic {
    fn plan(&self, piece: &Piece, board: &Board) -> Option<Placement> {
        best_move_with(piece, board, &self.weights)
    }
}
