//! Pieces module - piece catalog and piece instances
//!
//! Every kind has a fixed, ordered list of orientations. Each orientation is a
//! square matrix (4x4 for I, 2x2 for O, 3x3 otherwise) stored as the offsets of
//! its four filled cells relative to the matrix's top-left corner.
//!
//! Rotation only advances the orientation index. There is no kick table: a
//! rotated candidate that collides is rejected by the caller and the piece keeps
//! its previous orientation.

use crate::types::{PieceKind, PIECE_KIND_COUNT, SPAWN_X, SPAWN_Y};

/// Offset of a single filled cell relative to the matrix top-left, as (column, row)
pub type MinoOffset = (i8, i8);

/// Shape of one orientation - 4 filled-cell offsets
pub type PieceShape = [MinoOffset; 4];

/// Static catalog entry for one piece kind
#[derive(Debug)]
pub struct PieceDef {
    pub kind: PieceKind,
    /// Side length of the square matrix every orientation lives in.
    pub matrix_size: u8,
    pub orientations: &'static [PieceShape],
    /// Display tag for renderers.
    pub color_tag: &'static str,
}

impl PieceDef {
    /// Render one orientation as a 0/1 matrix (rows top to bottom).
    pub fn matrix(&self, orientation: u8) -> Option<Vec<Vec<u8>>> {
        let shape = self.orientations.get(orientation as usize)?;
        let n = self.matrix_size as usize;
        let mut rows = vec![vec![0u8; n]; n];
        for &(c, r) in shape {
            rows[r as usize][c as usize] = 1;
        }
        Some(rows)
    }
}

const I_SHAPES: [PieceShape; 4] = [
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
];

const O_SHAPES: [PieceShape; 1] = [[(0, 0), (1, 0), (0, 1), (1, 1)]];

const T_SHAPES: [PieceShape; 4] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];

const S_SHAPES: [PieceShape; 4] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
    [(1, 1), (2, 1), (0, 2), (1, 2)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
];

const Z_SHAPES: [PieceShape; 4] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (1, 2), (2, 2)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
];

const J_SHAPES: [PieceShape; 4] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_SHAPES: [PieceShape; 4] = [
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

/// The catalog, indexed by [`PieceKind::index`].
pub static CATALOG: [PieceDef; PIECE_KIND_COUNT] = [
    PieceDef {
        kind: PieceKind::I,
        matrix_size: 4,
        orientations: &I_SHAPES,
        color_tag: "cyan",
    },
    PieceDef {
        kind: PieceKind::O,
        matrix_size: 2,
        orientations: &O_SHAPES,
        color_tag: "yellow",
    },
    PieceDef {
        kind: PieceKind::T,
        matrix_size: 3,
        orientations: &T_SHAPES,
        color_tag: "purple",
    },
    PieceDef {
        kind: PieceKind::S,
        matrix_size: 3,
        orientations: &S_SHAPES,
        color_tag: "green",
    },
    PieceDef {
        kind: PieceKind::Z,
        matrix_size: 3,
        orientations: &Z_SHAPES,
        color_tag: "red",
    },
    PieceDef {
        kind: PieceKind::J,
        matrix_size: 3,
        orientations: &J_SHAPES,
        color_tag: "blue",
    },
    PieceDef {
        kind: PieceKind::L,
        matrix_size: 3,
        orientations: &L_SHAPES,
        color_tag: "orange",
    },
];

/// Look up the catalog entry for a kind
pub fn piece_def(kind: PieceKind) -> &'static PieceDef {
    &CATALOG[kind.index()]
}

/// Number of orientations for a kind (1 for O, 4 otherwise)
pub fn orientation_count(kind: PieceKind) -> u8 {
    piece_def(kind).orientations.len() as u8
}

/// Get the filled-cell offsets for a kind and orientation
///
/// Returns `None` for an orientation index the kind does not have.
pub fn get_shape(kind: PieceKind, orientation: u8) -> Option<&'static PieceShape> {
    piece_def(kind).orientations.get(orientation as usize)
}

/// A piece instance: kind, orientation index and matrix anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub orientation: u8,
    /// Column of the matrix's top-left corner (may be negative).
    pub x: i8,
    /// Row of the matrix's top-left corner (may be negative).
    pub y: i8,
    pub landed: bool,
}

impl Piece {
    /// Create a new piece at the spawn anchor in orientation 0
    pub fn new(kind: PieceKind) -> Self {
        Self::at(kind, 0, SPAWN_X, SPAWN_Y)
    }

    pub fn at(kind: PieceKind, orientation: u8, x: i8, y: i8) -> Self {
        Self {
            kind,
            orientation,
            x,
            y,
            landed: false,
        }
    }

    /// Filled-cell offsets for the current orientation
    pub fn shape(&self) -> Option<&'static PieceShape> {
        get_shape(self.kind, self.orientation)
    }

    /// Rotation candidate: orientation advanced by `direction`, anchor unchanged
    ///
    /// The caller decides whether the candidate is legal.
    pub fn rotated(&self, direction: i8) -> Self {
        let count = orientation_count(self.kind) as i16;
        let next = (self.orientation as i16 + direction as i16).rem_euclid(count);
        Self {
            orientation: next as u8,
            ..*self
        }
    }

    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    /// Horizontal extent of the current orientation as (min column, max column) offsets
    pub fn column_span(&self) -> Option<(i8, i8)> {
        let shape = self.shape()?;
        let min = shape.iter().map(|&(c, _)| c).min()?;
        let max = shape.iter().map(|&(c, _)| c).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_indexed_by_kind() {
        for kind in PieceKind::ALL {
            assert_eq!(piece_def(kind).kind, kind);
        }
    }

    #[test]
    fn every_orientation_fits_its_matrix() {
        for def in CATALOG.iter() {
            for shape in def.orientations {
                for &(c, r) in shape {
                    assert!(c >= 0 && (c as u8) < def.matrix_size, "{:?}", def.kind);
                    assert!(r >= 0 && (r as u8) < def.matrix_size, "{:?}", def.kind);
                }
            }
        }
    }

    #[test]
    fn rotation_wraps_both_ways() {
        let t = Piece::new(PieceKind::T);
        assert_eq!(t.rotated(1).orientation, 1);
        assert_eq!(t.rotated(-1).orientation, 3);
        assert_eq!(t.rotated(1).rotated(-1), t);

        let o = Piece::new(PieceKind::O);
        assert_eq!(o.rotated(1).orientation, 0);
        assert_eq!(o.rotated(-1).orientation, 0);
    }

    #[test]
    fn rotation_keeps_anchor() {
        let p = Piece::at(PieceKind::L, 2, -1, 7);
        let r = p.rotated(1);
        assert_eq!((r.x, r.y), (-1, 7));
    }

    #[test]
    fn matrix_matches_offsets() {
        let m = piece_def(PieceKind::T).matrix(0).unwrap();
        assert_eq!(m, vec![vec![0, 1, 0], vec![1, 1, 1], vec![0, 0, 0]]);
        assert!(piece_def(PieceKind::O).matrix(1).is_none());
    }
}
