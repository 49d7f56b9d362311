//! Scoring module - fixed two-board score and garbage tables
//!
//! A clear of four rows scores 800 and sends 4 garbage rows. Any other clear of
//! `n` rows scores `n * 100` and sends `n - 1` rows, so single clears never
//! attack.

use crate::types::{FOUR_LINE_GARBAGE, FOUR_LINE_SCORE, LINE_SCORE};

/// Points awarded for clearing `lines` rows in one merge
pub fn line_clear_score(lines: usize) -> u64 {
    match lines {
        0 => 0,
        4 => FOUR_LINE_SCORE,
        n => n as u64 * LINE_SCORE,
    }
}

/// Garbage rows sent to the other board for clearing `lines` rows
pub fn garbage_for_clear(lines: usize) -> u8 {
    match lines {
        0 | 1 => 0,
        4 => FOUR_LINE_GARBAGE,
        n => (n - 1).min(u8::MAX as usize) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_score_table() {
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(1), 100);
        assert_eq!(line_clear_score(2), 200);
        assert_eq!(line_clear_score(3), 300);
        assert_eq!(line_clear_score(4), 800);
    }

    #[test]
    fn test_garbage_table() {
        assert_eq!(garbage_for_clear(0), 0);
        assert_eq!(garbage_for_clear(1), 0);
        assert_eq!(garbage_for_clear(2), 1);
        assert_eq!(garbage_for_clear(3), 2);
        assert_eq!(garbage_for_clear(4), 4);
    }
}
