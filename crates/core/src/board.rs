//! Board module - manages the game grid
//!
//! The board is a fixed 10x20 grid of [`Cell`]s stored as an array of row
//! buffers, so collapsing rows and injecting garbage move whole rows with
//! `copy_within` instead of touching individual cells.
//!
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom). Rows above the grid (y < 0) are never checked: a piece may
//! hang partially above the top edge.

use arrayvec::ArrayVec;

use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// One board row
pub type Row = [Cell; WIDTH];

/// Indices of rows removed by a sweep, top to bottom, in pre-sweep coordinates
pub type ClearedRows = ArrayVec<u8, HEIGHT>;

/// The game board - 10 columns x 20 rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [Row; HEIGHT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            rows: [[Cell::Empty; WIDTH]; HEIGHT],
        }
    }

    /// Build a board from text rows, aligned to the bottom of the grid
    ///
    /// `.` is empty, `#` or `G` is garbage, and piece letters (`I O T S Z J L`)
    /// are merged cells of that kind. Missing rows at the top are empty; short
    /// rows are padded with empty cells on the right.
    pub fn from_rows(lines: &[&str]) -> Self {
        let mut board = Self::new();
        let skip = lines.len().saturating_sub(HEIGHT);
        let offset = HEIGHT - (lines.len() - skip);
        for (i, line) in lines.iter().skip(skip).enumerate() {
            for (x, ch) in line.chars().take(WIDTH).enumerate() {
                board.rows[offset + i][x] = match ch {
                    '#' | 'G' => Cell::Garbage,
                    other => PieceKind::from_str(&other.to_string())
                        .map(Cell::Filled)
                        .unwrap_or(Cell::Empty),
                };
            }
        }
        board
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<(usize, usize)> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|(x, y)| self.rows[y][x])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(cell) if cell.is_occupied())
    }

    pub fn row(&self, y: usize) -> Option<&Row> {
        self.rows.get(y)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Check if a row is completely filled (garbage counts)
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(Cell::is_occupied))
    }

    /// Whether `piece` shifted by (dx, dy) would collide
    ///
    /// A filled cell collides when it leaves the grid to the left, right or
    /// bottom, or lands on an occupied cell at y >= 0. Cells above the grid never
    /// collide. An orientation the kind does not have always collides.
    pub fn collides(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        let Some(shape) = piece.shape() else {
            return true;
        };

        shape.iter().any(|&(c, r)| {
            let fx = piece.x as i16 + c as i16 + dx as i16;
            let fy = piece.y as i16 + r as i16 + dy as i16;
            if fx < 0 || fx >= WIDTH as i16 || fy >= HEIGHT as i16 {
                return true;
            }
            fy >= 0 && self.rows[fy as usize][fx as usize].is_occupied()
        })
    }

    /// Largest dy the piece can fall; one more row would collide
    ///
    /// Returns 0 when the piece cannot move down at all.
    pub fn hard_drop_offset(&self, piece: &Piece) -> i8 {
        let mut dy: i8 = 0;
        while dy < i8::MAX && !self.collides(piece, 0, dy + 1) {
            dy += 1;
        }
        dy
    }

    /// Write the piece's kind into every filled cell inside the grid
    ///
    /// Cells above the top edge are dropped. Returns the number of cells written.
    pub fn merge(&mut self, piece: &Piece) -> usize {
        let Some(shape) = piece.shape() else {
            return 0;
        };

        let mut written = 0;
        for &(c, r) in shape {
            let fx = piece.x as i16 + c as i16;
            let fy = piece.y as i16 + r as i16;
            if (0..HEIGHT as i16).contains(&fy) && (0..WIDTH as i16).contains(&fx) {
                self.rows[fy as usize][fx as usize] = Cell::Filled(piece.kind);
                written += 1;
            }
        }
        written
    }

    /// Remove all full rows and collapse the rest downward
    ///
    /// Surviving rows keep their relative order; empty rows refill the top.
    /// Uses a two-pointer scan from the bottom without allocating.
    pub fn sweep(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut write_y = HEIGHT;

        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared.push(read_y as u8);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    self.rows[write_y] = self.rows[read_y];
                }
            }
        }

        for row in &mut self.rows[..write_y] {
            *row = [Cell::Empty; WIDTH];
        }

        cleared.reverse();
        cleared
    }

    /// Push `count` garbage rows in from the bottom
    ///
    /// Each step discards the top row (whatever it held) and appends a row that
    /// is garbage everywhere except the column `hole()` picks. Returns how many
    /// discarded top rows had occupied cells.
    pub fn inject_garbage(&mut self, count: u8, mut hole: impl FnMut() -> u8) -> u8 {
        let mut truncated = 0;
        for _ in 0..count {
            if self.rows[0].iter().any(Cell::is_occupied) {
                truncated += 1;
            }
            self.rows.copy_within(1.., 0);

            let mut garbage = [Cell::Garbage; WIDTH];
            garbage[hole() as usize % WIDTH] = Cell::Empty;
            self.rows[HEIGHT - 1] = garbage;
        }
        truncated
    }

    /// Height of every column: rows from the first occupied cell to the floor
    pub fn column_heights(&self) -> [u8; WIDTH] {
        let mut heights = [0u8; WIDTH];
        for (x, h) in heights.iter_mut().enumerate() {
            if let Some(top) = (0..HEIGHT).find(|&y| self.rows[y][x].is_occupied()) {
                *h = (HEIGHT - top) as u8;
            }
        }
        heights
    }

    /// Empty cells below the first occupied cell of their column
    pub fn holes(&self) -> u32 {
        let mut holes = 0;
        for x in 0..WIDTH {
            let mut covered = false;
            for row in &self.rows {
                if row[x].is_occupied() {
                    covered = true;
                } else if covered {
                    holes += 1;
                }
            }
        }
        holes
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Piece;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some((0, 0)));
        assert_eq!(Board::index(9, 19), Some((9, 19)));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_from_rows_aligns_to_bottom() {
        let board = Board::from_rows(&["#.........", "TTT.......", "I"]);
        assert_eq!(board.get(0, 17), Some(Cell::Garbage));
        assert_eq!(board.get(1, 17), Some(Cell::Empty));
        assert_eq!(board.get(2, 18), Some(Cell::Filled(PieceKind::T)));
        assert_eq!(board.get(0, 19), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.get(1, 19), Some(Cell::Empty));
    }

    #[test]
    fn test_collides_with_unknown_orientation() {
        let board = Board::new();
        let bad = Piece::at(PieceKind::O, 3, 4, 4);
        assert!(board.collides(&bad, 0, 0));
        assert_eq!(board.hard_drop_offset(&bad), 0);
    }

    #[test]
    fn test_collides_tolerates_extreme_deltas() {
        let board = Board::new();
        let p = Piece::at(PieceKind::T, 0, i8::MAX, i8::MAX);
        assert!(board.collides(&p, i8::MAX, i8::MAX));
        let q = Piece::at(PieceKind::T, 0, 3, i8::MIN);
        assert!(!board.collides(&q, 0, i8::MIN));
    }

    #[test]
    fn test_merge_drops_cells_above_top() {
        let mut board = Board::new();
        let i_vertical = Piece::at(PieceKind::I, 1, 0, -2);
        assert_eq!(board.merge(&i_vertical), 2);
        assert_eq!(board.get(2, 0), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.get(2, 1), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.get(2, 2), Some(Cell::Empty));
    }

    #[test]
    fn test_column_heights_and_holes() {
        let board = Board::from_rows(&["..T.......", ".TTT......", "...#......"]);
        let h = board.column_heights();
        assert_eq!(&h[..5], &[0, 2, 3, 2, 0]);
        // (1,19) and (2,19) are empty below filled cells.
        assert_eq!(board.holes(), 2);
    }
}
