//! Session module - one board's complete state
//!
//! A session owns its board, active/next pieces, queue, hold slot and score.
//! It never reaches into the other board: a merge that attacks returns an
//! [`InjectGarbage`] command and the match controller applies it to the
//! opponent.

use crate::board::{Board, ClearedRows};
use crate::pieces::Piece;
use crate::rng::PieceQueue;
use crate::scoring::{garbage_for_clear, line_clear_score};
use crate::snapshot::SessionSnapshot;
use crate::types::{Action, Effect, PieceKind, BOARD_WIDTH};

/// Command to push garbage rows into the *other* board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InjectGarbage {
    pub count: u8,
}

/// Outcome of merging the active piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// The piece as it was merged (`landed` set).
    pub piece: Piece,
    pub cleared_rows: ClearedRows,
    pub score_gained: u64,
    /// Piece cells that ended above the top edge and were dropped.
    pub cells_lost: u8,
    pub attack: Option<InjectGarbage>,
    /// The next piece collides at spawn; this board has lost.
    pub topped_out: bool,
}

impl MergeReport {
    pub fn lines_cleared(&self) -> usize {
        self.cleared_rows.len()
    }
}

/// What a gravity step or action did to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The active piece moved, rotated or was swapped through hold.
    Moved,
    /// The active piece merged and the next piece spawned.
    Merged(MergeReport),
    /// The active piece merged and the next piece could not spawn.
    GameOver(MergeReport),
}

/// Target placement chosen for the heuristic board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Anchor column of the piece matrix.
    pub x: i8,
    pub orientation: u8,
}

/// Result of one control step toward a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlStep {
    Applied(Action),
    /// The step was illegal and left the piece unchanged.
    Blocked(Action),
    /// Orientation and column already match the target.
    Arrived,
}

/// What one think tick decided and did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlHint {
    pub target: Placement,
    pub step: ControlStep,
}

/// Next unit action that brings `piece` closer to `target`
///
/// Orientation is fixed first (one rotation at a time), then the column, one
/// cell at a time.
pub fn control_action(piece: &Piece, target: Placement) -> Option<Action> {
    if piece.orientation != target.orientation {
        Some(Action::Rotate)
    } else if piece.x < target.x {
        Some(Action::Right)
    } else if piece.x > target.x {
        Some(Action::Left)
    } else {
        None
    }
}

/// One board's state
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    current: Option<Piece>,
    next: Piece,
    queue: PieceQueue,
    hold: Option<PieceKind>,
    can_hold: bool,
    score: u64,
    lines: u32,
    pieces_merged: u32,
    /// Rows removed by the latest merge (cosmetic, expired by the match).
    pending_clear: ClearedRows,
    effect: Option<Effect>,
    topped_out: bool,
}

impl Session {
    /// Create a fresh session: the first bag supplies the active piece, then
    /// one more draw fills the next slot.
    pub fn new(seed: u32) -> Self {
        let (first, mut queue) = PieceQueue::start(seed);
        let next = Piece::new(queue.draw());

        Self {
            board: Board::new(),
            current: Some(Piece::new(first)),
            next,
            queue,
            hold: None,
            can_hold: true,
            score: 0,
            lines: 0,
            pieces_merged: 0,
            pending_clear: ClearedRows::new(),
            effect: None,
            topped_out: false,
        }
    }

    /// Start from an existing board (tests, puzzles)
    pub fn with_board(seed: u32, board: Board) -> Self {
        Self {
            board,
            ..Self::new(seed)
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn next(&self) -> Piece {
        self.next
    }

    pub fn queue(&self) -> &PieceQueue {
        &self.queue
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces_merged(&self) -> u32 {
        self.pieces_merged
    }

    pub fn pending_clear(&self) -> &ClearedRows {
        &self.pending_clear
    }

    pub fn effect(&self) -> Option<Effect> {
        self.effect
    }

    pub fn topped_out(&self) -> bool {
        self.topped_out
    }

    /// RNG state, used to reseed on restart
    pub fn seed(&self) -> u32 {
        self.queue.seed()
    }

    /// Replace the active piece (tests, scripted setups)
    pub fn set_current(&mut self, piece: Piece) {
        self.current = Some(piece);
    }

    pub fn clear_pending(&mut self) {
        self.pending_clear.clear();
    }

    pub fn set_effect(&mut self, effect: Option<Effect>) {
        self.effect = effect;
    }

    fn playable(&self) -> Option<Piece> {
        if self.topped_out {
            return None;
        }
        self.current
    }

    /// Try to move the active piece
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.playable() else {
            return false;
        };

        if self.board.collides(&active, dx, dy) {
            return false;
        }
        self.current = Some(active.shifted(dx, dy));
        true
    }

    /// Try to rotate the active piece; a colliding candidate is discarded
    pub fn try_rotate(&mut self, direction: i8) -> bool {
        let Some(active) = self.playable() else {
            return false;
        };

        let candidate = active.rotated(direction);
        if self.board.collides(&candidate, 0, 0) {
            return false;
        }
        self.current = Some(candidate);
        true
    }

    /// Row the active piece would rest on after a hard drop
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.playable()?;
        Some(active.y.saturating_add(self.board.hard_drop_offset(&active)))
    }

    /// Drop the active piece to its resting row and merge it
    pub fn hard_drop(&mut self) -> Option<SessionEvent> {
        let active = self.playable()?;
        let dy = self.board.hard_drop_offset(&active);
        self.current = Some(active.shifted(0, dy));
        self.lock()
    }

    /// Swap the active piece with the hold slot
    ///
    /// An empty slot takes the active kind and the next piece comes in; a held
    /// kind comes back at spawn. Either way hold stays locked until the next
    /// merge. The incoming piece is not checked against the stack: if it
    /// spawns overlapping, gravity merges it in place and the next spawn decides
    /// top-out.
    pub fn hold(&mut self) -> bool {
        if !self.can_hold {
            return false;
        }
        let Some(active) = self.playable() else {
            return false;
        };

        match self.hold {
            Some(held) => self.current = Some(Piece::new(held)),
            None => {
                self.current = Some(self.next);
                self.next = Piece::new(self.queue.draw());
            }
        }

        self.hold = Some(active.kind);
        self.can_hold = false;
        true
    }

    /// Merge the active piece where it is, sweep, score and spawn the next piece
    pub fn lock(&mut self) -> Option<SessionEvent> {
        let active = self.playable()?;

        let written = self.board.merge(&active);
        let cleared_rows = self.board.sweep();
        let lines = cleared_rows.len();

        let score_gained = line_clear_score(lines);
        self.score += score_gained;
        self.lines += lines as u32;
        self.pieces_merged += 1;

        let attack = match garbage_for_clear(lines) {
            0 => None,
            count => Some(InjectGarbage { count }),
        };

        let topped_out = self.board.collides(&self.next, 0, 0);
        let drawn = Piece::new(self.queue.draw());
        if topped_out {
            self.current = None;
            self.topped_out = true;
        } else {
            self.current = Some(self.next);
        }
        self.next = drawn;
        self.can_hold = true;
        self.pending_clear = cleared_rows.clone();

        let report = MergeReport {
            piece: Piece {
                landed: true,
                ..active
            },
            cleared_rows,
            score_gained,
            cells_lost: (4 - written) as u8,
            attack,
            topped_out,
        };

        Some(if topped_out {
            SessionEvent::GameOver(report)
        } else {
            SessionEvent::Merged(report)
        })
    }

    /// One gravity step: fall a row, or merge at the current row when blocked
    pub fn gravity_step(&mut self) -> Option<SessionEvent> {
        self.playable()?;
        if self.try_move(0, 1) {
            Some(SessionEvent::Moved)
        } else {
            self.lock()
        }
    }

    /// Apply a discrete action; `None` when it was rejected or had no effect
    pub fn apply_action(&mut self, action: Action) -> Option<SessionEvent> {
        let moved = match action {
            Action::Left => self.try_move(-1, 0),
            Action::Right => self.try_move(1, 0),
            Action::Down => self.try_move(0, 1),
            Action::Rotate => self.try_rotate(1),
            Action::Hold => self.hold(),
            Action::HardDrop => return self.hard_drop(),
        };
        moved.then_some(SessionEvent::Moved)
    }

    /// Take one control step toward `target`
    pub fn step_toward(&mut self, target: Placement) -> ControlStep {
        let Some(active) = self.playable() else {
            return ControlStep::Arrived;
        };
        match control_action(&active, target) {
            Some(action) => {
                if self.apply_action(action).is_some() {
                    ControlStep::Applied(action)
                } else {
                    ControlStep::Blocked(action)
                }
            }
            None => ControlStep::Arrived,
        }
    }

    /// Push garbage rows in from the bottom; holes come from this board's RNG
    ///
    /// Returns how many discarded top rows still held blocks.
    pub fn receive_garbage(&mut self, command: InjectGarbage) -> u8 {
        self.board
            .inject_garbage(command.count, || self.queue.next_hole(BOARD_WIDTH))
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.board.clone_from(&self.board);
        out.active = self.playable();
        out.ghost_y = self.ghost_y();
        out.next = self.next.kind;
        out.queue = self.queue.preview();
        out.hold = self.hold;
        out.can_hold = self.can_hold;
        out.score = self.score;
        out.lines = self.lines;
        out.clearing.clone_from(&self.pending_clear);
        out.effect = self.effect;
        out.topped_out = self.topped_out;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, BOARD_HEIGHT};

    fn full_rows_except(hole_x: usize, rows: usize) -> Vec<String> {
        (0..rows)
            .map(|_| {
                (0..10)
                    .map(|x| if x == hole_x { '.' } else { '#' })
                    .collect()
            })
            .collect()
    }

    fn session_with(rows: &[String], piece: Piece) -> Session {
        let lines: Vec<&str> = rows.iter().map(String::as_str).collect();
        let mut s = Session::with_board(1, Board::from_rows(&lines));
        s.set_current(piece);
        s
    }

    #[test]
    fn test_new_session() {
        let s = Session::new(12345);
        assert!(s.current().is_some());
        assert!(s.hold_piece().is_none());
        assert!(s.can_hold());
        assert_eq!(s.score(), 0);
        assert!(!s.topped_out());
        assert_eq!(s.board(), &Board::new());
        // 7 - 1 (active) - 1 (next) = 5, refilled lazily on the next draw.
        assert_eq!(s.queue().len(), 5);
    }

    #[test]
    fn test_try_move_and_walls() {
        let mut s = Session::new(1);
        s.set_current(Piece::at(PieceKind::O, 0, 0, 0));
        assert!(!s.try_move(-1, 0));
        assert!(s.try_move(1, 0));
        assert_eq!(s.current().unwrap().x, 1);
    }

    #[test]
    fn test_rotation_rejected_against_wall() {
        let mut s = Session::new(1);
        // Vertical I hugging the left wall: column offset 1 at x = -1.
        s.set_current(Piece::at(PieceKind::I, 3, -1, 0));
        assert!(!s.try_rotate(1));
        assert_eq!(s.current().unwrap().orientation, 3);
        assert_eq!(s.current().unwrap().x, -1);
    }

    #[test]
    fn test_hard_drop_single_clear() {
        let rows = full_rows_except(9, 1);
        let mut s = session_with(&rows, Piece::at(PieceKind::I, 1, 7, 0));
        let next_kind = s.next().kind;

        let Some(SessionEvent::Merged(report)) = s.hard_drop() else {
            panic!("expected merge");
        };
        assert_eq!(report.lines_cleared(), 1);
        assert_eq!(report.cleared_rows.as_slice(), &[BOARD_HEIGHT - 1]);
        assert_eq!(report.score_gained, 100);
        assert!(report.attack.is_none());
        assert!(report.piece.landed);
        assert_eq!(s.score(), 100);
        assert_eq!(s.current().unwrap().kind, next_kind);
        assert_eq!(s.pending_clear().len(), 1);

        // The three I cells above the cleared row fell by one.
        assert_eq!(s.board().get(9, 19), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(s.board().get(9, 17), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(s.board().get(9, 16), Some(Cell::Empty));
    }

    #[test]
    fn test_four_line_clear_attacks_with_four() {
        let rows = full_rows_except(0, 4);
        let mut s = session_with(&rows, Piece::at(PieceKind::I, 3, -1, 0));

        let Some(SessionEvent::Merged(report)) = s.hard_drop() else {
            panic!("expected merge");
        };
        assert_eq!(report.lines_cleared(), 4);
        assert_eq!(report.score_gained, 800);
        assert_eq!(report.attack, Some(InjectGarbage { count: 4 }));
        assert_eq!(s.board(), &Board::new());
    }

    #[test]
    fn test_hold_empty_then_swap() {
        let mut s = Session::new(3);
        let first = s.current().unwrap().kind;
        let next = s.next().kind;

        assert!(s.hold());
        assert_eq!(s.hold_piece(), Some(first));
        assert_eq!(s.current().unwrap().kind, next);
        assert!(!s.can_hold());
        assert!(!s.hold());

        s.hard_drop();
        assert!(s.can_hold());

        let before = s.current().unwrap().kind;
        s.try_move(1, 0);
        assert!(s.hold());
        let swapped = s.current().unwrap();
        assert_eq!(swapped, Piece::new(first));
        assert_eq!(s.hold_piece(), Some(before));
    }

    #[test]
    fn test_hold_ignores_stack_at_spawn() {
        // Spawn rows blocked in column 4; the active piece sits lower, clear of it.
        let mut board = Board::new();
        board.set(4, 0, Cell::Garbage);
        board.set(4, 1, Cell::Garbage);
        let mut s = Session::with_board(5, board);
        s.set_current(Piece::at(PieceKind::I, 1, -2, 5));
        let next = s.next().kind;
        assert!(s.board().collides(&s.next(), 0, 0));

        assert!(s.hold());
        assert_eq!(s.hold_piece(), Some(PieceKind::I));
        assert_eq!(s.current(), Some(Piece::new(next)));
        assert!(!s.can_hold());
    }

    #[test]
    fn test_hold_swap_back_ignores_stack_at_spawn() {
        let mut s = Session::new(6);
        let first = s.current().unwrap().kind;
        assert!(s.hold());
        s.hard_drop();

        // Block the whole spawn area, then swap the held kind back in.
        for x in 0..BOARD_WIDTH as i8 {
            s.board.set(x, 1, Cell::Garbage);
        }
        s.set_current(Piece::at(PieceKind::O, 0, 4, 10));
        assert!(s.hold());
        assert_eq!(s.current(), Some(Piece::new(first)));
        assert_eq!(s.hold_piece(), Some(PieceKind::O));
    }

    #[test]
    fn test_overlapping_spawn_after_hold_merges_and_tops_out() {
        let rows: Vec<String> = (0..19).map(|_| "#########.".to_string()).collect();
        let mut s = session_with(&rows, Piece::at(PieceKind::I, 1, 7, -3));
        assert!(s.hold());
        assert!(s.board().collides(&s.current().unwrap(), 0, 0));

        // Blocked at once: gravity merges where it stands and the next spawn fails.
        assert!(matches!(s.gravity_step(), Some(SessionEvent::GameOver(_))));
        assert!(s.topped_out());
        assert_eq!(s.current(), None);
    }

    #[test]
    fn test_gravity_moves_then_merges() {
        let mut s = Session::new(8);
        s.set_current(Piece::at(PieceKind::O, 0, 4, 17));
        assert_eq!(s.gravity_step(), Some(SessionEvent::Moved));
        assert!(matches!(s.gravity_step(), Some(SessionEvent::Merged(_))));
        assert_eq!(s.board().get(4, 19), Some(Cell::Filled(PieceKind::O)));
        assert_eq!(s.pieces_merged(), 1);
    }

    #[test]
    fn test_top_out_ends_session() {
        // Stack reaching row 2 blocks every spawn position.
        let rows: Vec<String> = (0..18).map(|_| "#########.".to_string()).collect();
        let mut s = session_with(&rows, Piece::at(PieceKind::O, 0, 4, 0));

        let event = s.gravity_step();
        assert!(matches!(event, Some(SessionEvent::GameOver(ref r)) if r.topped_out));
        assert!(s.topped_out());
        assert!(s.current().is_none());

        // Terminal state: everything is a no-op.
        assert_eq!(s.apply_action(Action::Left), None);
        assert_eq!(s.apply_action(Action::HardDrop), None);
        assert_eq!(s.gravity_step(), None);
    }

    #[test]
    fn test_step_toward_rotates_before_shifting() {
        let mut s = Session::new(2);
        s.set_current(Piece::at(PieceKind::T, 0, 3, 0));
        let target = Placement { x: 5, orientation: 2 };

        assert_eq!(s.step_toward(target), ControlStep::Applied(Action::Rotate));
        assert_eq!(s.step_toward(target), ControlStep::Applied(Action::Rotate));
        assert_eq!(s.step_toward(target), ControlStep::Applied(Action::Right));
        assert_eq!(s.step_toward(target), ControlStep::Applied(Action::Right));
        assert_eq!(s.step_toward(target), ControlStep::Arrived);
        assert_eq!(s.current().unwrap(), Piece::at(PieceKind::T, 2, 5, 0));
    }

    #[test]
    fn test_receive_garbage_keeps_one_hole_per_row() {
        let mut s = Session::new(4);
        assert_eq!(s.receive_garbage(InjectGarbage { count: 3 }), 0);
        for y in 17..20 {
            let row = s.board().row(y).unwrap();
            assert_eq!(row.iter().filter(|c| !c.is_occupied()).count(), 1);
        }
        assert!(s.board().row(16).unwrap().iter().all(|c| !c.is_occupied()));
    }
}
