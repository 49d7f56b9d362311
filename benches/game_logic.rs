use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_duel::core::{Board, Match, MatchConfig, MatchSnapshot, Piece};
use tetris_duel::engine::{best_move, Heuristic};
use tetris_duel::types::{Cell, PieceKind, SCHEDULER_TICK_MS};

fn bench_match_tick(c: &mut Criterion) {
    let mut duel = Match::new(MatchConfig::with_seed(12345), Heuristic::default());
    duel.start(0);
    let mut now = 0u64;

    c.bench_function("match_tick_50ms", |b| {
        b.iter(|| {
            now += SCHEDULER_TICK_MS as u64;
            if duel.game_over() {
                duel.start(now);
            }
            black_box(duel.tick(black_box(now)));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Cell::Filled(PieceKind::I));
                }
            }
            black_box(board.sweep());
        })
    });
}

fn bench_hard_drop_offset(c: &mut Criterion) {
    let board = Board::from_rows(&["..#.......", ".###...#..", "####.#####"]);
    let piece = Piece::new(PieceKind::T);

    c.bench_function("hard_drop_offset", |b| {
        b.iter(|| black_box(&board).hard_drop_offset(black_box(&piece)))
    });
}

fn bench_best_move(c: &mut Criterion) {
    let board = Board::from_rows(&[
        "...#......",
        "..###...#.",
        "#.####.###",
        "####.#####",
    ]);

    c.bench_function("best_move_t", |b| {
        b.iter(|| best_move(black_box(&Piece::new(PieceKind::T)), black_box(&board)))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut duel = Match::new(MatchConfig::with_seed(12345), Heuristic::default());
    duel.start(0);
    let mut out = MatchSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            duel.snapshot_into(&mut out);
            black_box(&out);
        })
    });
}

criterion_group!(
    benches,
    bench_match_tick,
    bench_line_clear,
    bench_hard_drop_offset,
    bench_best_move,
    bench_snapshot
);
criterion_main!(benches);
