//! RNG module - bag randomizer with lookahead
//!
//! A fresh bag holds one of each kind (I, O, T, S, Z, J, L), shuffled. The queue
//! is topped up with a whole new bag whenever fewer than
//! [`QUEUE_LOOKAHEAD`](crate::types::QUEUE_LOOKAHEAD) kinds remain at draw time,
//! so a caller never observes it empty.
//!
//! Also provides a simple LCG so identical seeds replay identical matches.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::types::{PieceKind, QUEUE_LOOKAHEAD};

/// Upcoming kinds shown to renderers
pub type Preview = ArrayVec<PieceKind, QUEUE_LOOKAHEAD>;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state (feeding it back to `new` resumes the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Upcoming piece kinds for one board
#[derive(Debug, Clone)]
pub struct PieceQueue {
    pending: VecDeque<PieceKind>,
    rng: SimpleRng,
}

impl PieceQueue {
    /// Shuffle one full bag, pop its first kind as the active piece and keep the
    /// remaining six as the queue.
    pub fn start(seed: u32) -> (PieceKind, Self) {
        let mut queue = Self {
            pending: VecDeque::with_capacity(2 * PieceKind::ALL.len()),
            rng: SimpleRng::new(seed),
        };
        queue.push_bag();
        let first = queue.pop_front_or_refill();
        (first, queue)
    }

    /// Append a freshly shuffled full set of kinds
    fn push_bag(&mut self) {
        let mut bag = PieceKind::ALL;
        self.rng.shuffle(&mut bag);
        self.pending.extend(bag);
    }

    fn pop_front_or_refill(&mut self) -> PieceKind {
        match self.pending.pop_front() {
            Some(kind) => kind,
            None => {
                self.push_bag();
                // A bag is never empty.
                self.pending.pop_front().unwrap_or(PieceKind::I)
            }
        }
    }

    /// Draw the next kind, topping the queue up first if it is running short
    pub fn draw(&mut self) -> PieceKind {
        if self.pending.len() < QUEUE_LOOKAHEAD {
            self.push_bag();
        }
        self.pop_front_or_refill()
    }

    /// The next `QUEUE_LOOKAHEAD` kinds (fewer if the queue is shorter)
    pub fn preview(&self) -> Preview {
        self.pending.iter().copied().take(QUEUE_LOOKAHEAD).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate the queued kinds front to back
    pub fn iter(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pending.iter().copied()
    }

    /// Random column for a garbage hole, drawn from this board's RNG
    pub fn next_hole(&mut self, width: u8) -> u8 {
        self.rng.next_range(width as u32) as u8
    }

    /// Get the current RNG state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains_all_kinds(kinds: &[PieceKind]) -> bool {
        PieceKind::ALL.iter().all(|k| kinds.contains(k))
    }

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(10) < 10);
        }
    }

    #[test]
    fn test_start_pops_first_of_a_full_bag() {
        let (first, queue) = PieceQueue::start(1);
        assert_eq!(queue.len(), 6);

        let mut bag: Vec<PieceKind> = queue.iter().collect();
        bag.push(first);
        assert!(contains_all_kinds(&bag));
    }

    #[test]
    fn test_draw_replenishes_below_lookahead() {
        let (_, mut queue) = PieceQueue::start(3);

        // 6 -> 5 -> 4 without refilling.
        queue.draw();
        assert_eq!(queue.len(), 5);
        queue.draw();
        assert_eq!(queue.len(), 4);

        // 4 < 5: a new bag is appended before the draw.
        queue.draw();
        assert_eq!(queue.len(), 4 + 7 - 1);
    }

    #[test]
    fn test_queue_never_empty_over_many_draws() {
        let (_, mut queue) = PieceQueue::start(42);
        for _ in 0..500 {
            queue.draw();
            assert!(queue.len() >= QUEUE_LOOKAHEAD - 1);
        }
    }

    #[test]
    fn test_every_bag_window_holds_all_kinds() {
        let (first, mut queue) = PieceQueue::start(9);
        let mut drawn = vec![first];
        for _ in 0..(7 * 6 - 1) {
            drawn.push(queue.draw());
        }
        for bag in drawn.chunks(7) {
            assert!(contains_all_kinds(bag), "bag {:?}", bag);
        }
    }

    #[test]
    fn test_preview_matches_draws() {
        let (_, mut queue) = PieceQueue::start(5);
        let preview = queue.preview();
        assert_eq!(preview.len(), QUEUE_LOOKAHEAD);
        assert_eq!(queue.draw(), preview[0]);
        assert_eq!(queue.draw(), preview[1]);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let (a0, mut a) = PieceQueue::start(77);
        let (b0, mut b) = PieceQueue::start(77);
        assert_eq!(a0, b0);
        for _ in 0..30 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
