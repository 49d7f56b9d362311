//! Match-level tests: both boards, garbage exchange, game over and restart

use tetris_duel::core::{Board, Match, MatchConfig, MatchEvent, Phase, Piece, Session};
use tetris_duel::engine::Heuristic;
use tetris_duel::types::{Action, Effect, PieceKind, Side, BOARD_WIDTH, SCHEDULER_TICK_MS};

fn running(seed: u32) -> Match<Heuristic> {
    let mut m = Match::new(MatchConfig::with_seed(seed), Heuristic::default());
    m.start(0);
    m
}

/// Give the player a stack with column 0 open and a vertical I above it.
fn prime_player(m: &mut Match<Heuristic>, rows: usize) {
    let lines: Vec<&str> = vec![".#########"; rows];
    let player = m.session_mut(Side::Player);
    *player = Session::with_board(9, Board::from_rows(&lines));
    player.set_current(Piece::at(PieceKind::I, 3, -1, 0));
}

fn occupied_in_row(board: &Board, y: usize) -> usize {
    board
        .row(y)
        .map_or(0, |row| row.iter().filter(|c| c.is_occupied()).count())
}

#[test]
fn test_start_puts_both_boards_in_play() {
    let m = running(42);
    assert_eq!(m.phase(), Phase::Running);
    assert_eq!(m.winner(), None);

    let snap = m.snapshot();
    assert!(snap.playable());
    for side in [Side::Player, Side::Opponent] {
        let board = snap.side(side);
        assert!(board.active.is_some());
        assert_eq!(board.queue.len(), 5);
        assert_eq!(board.score, 0);
        assert!(board.can_hold);
    }
}

#[test]
fn test_same_seed_and_script_replay_identically() {
    let script = [
        (Action::Left, 120),
        (Action::Rotate, 300),
        (Action::HardDrop, 450),
        (Action::Right, 900),
        (Action::Hold, 1200),
        (Action::HardDrop, 1500),
    ];

    let play = || {
        let mut m = running(77);
        let mut now = 0;
        let mut actions = script.iter().peekable();
        while now <= 5_000 {
            while let Some((action, _)) = actions.next_if(|(_, at)| *at <= now) {
                m.apply_action(Side::Player, *action, now);
            }
            m.tick(now);
            now += SCHEDULER_TICK_MS as u64;
        }
        m.snapshot()
    };

    assert_eq!(play(), play());
}

#[test]
fn test_four_line_clear_sends_four_rows_in_the_same_call() {
    let mut m = running(5);
    prime_player(&mut m, 4);

    let events = m.apply_action(Side::Player, Action::HardDrop, 1000);
    assert_eq!(events.len(), 2);
    match &events[0] {
        MatchEvent::Merged {
            side,
            cleared_rows,
            score_gained,
            garbage_sent,
        } => {
            assert_eq!(*side, Side::Player);
            assert_eq!(cleared_rows.as_slice(), &[16, 17, 18, 19]);
            assert_eq!(*score_gained, 800);
            assert_eq!(*garbage_sent, 4);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(
        events[1],
        MatchEvent::GarbageApplied {
            side: Side::Opponent,
            count: 4,
            truncated_rows: 0
        }
    );

    let opponent = m.session(Side::Opponent).board();
    for y in 16..20 {
        assert_eq!(occupied_in_row(opponent, y), BOARD_WIDTH as usize - 1);
    }
    assert_eq!(m.session(Side::Player).board(), &Board::new());
    assert_eq!(m.session(Side::Player).score(), 800);
    assert_eq!(m.session(Side::Player).lines(), 4);

    let snap = m.snapshot();
    assert_eq!(snap.player.effect, Some(Effect::AttackLaunch));
    assert_eq!(snap.opponent.effect, Some(Effect::Attacked));
    assert_eq!(snap.player.clearing.len(), 4);
}

#[test]
fn test_two_line_clear_sends_one_row() {
    let mut m = running(5);
    prime_player(&mut m, 2);

    let events = m.apply_action(Side::Player, Action::HardDrop, 1000);
    assert!(matches!(
        events[0],
        MatchEvent::Merged {
            side: Side::Player,
            score_gained: 200,
            garbage_sent: 1,
            ..
        }
    ));
    assert_eq!(occupied_in_row(m.session(Side::Opponent).board(), 19), 9);
    assert_eq!(occupied_in_row(m.session(Side::Opponent).board(), 18), 0);
}

#[test]
fn test_single_line_clear_scores_without_attacking() {
    let mut m = running(5);
    prime_player(&mut m, 1);
    let opponent_before = m.session(Side::Opponent).board().clone();

    let events = m.apply_action(Side::Player, Action::HardDrop, 1000);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        MatchEvent::Merged {
            score_gained: 100,
            garbage_sent: 0,
            ..
        }
    ));
    assert_eq!(m.session(Side::Opponent).board(), &opponent_before);
    assert_eq!(m.session(Side::Player).effect(), None);
    assert_eq!(m.session(Side::Opponent).effect(), None);
}

#[test]
fn test_clear_flash_expires_on_a_later_tick() {
    let mut m = running(5);
    prime_player(&mut m, 1);
    m.apply_action(Side::Player, Action::HardDrop, 1000);
    assert_eq!(m.snapshot().player.clearing.as_slice(), &[19]);

    m.tick(1100);
    assert_eq!(m.snapshot().player.clearing.len(), 1);
    m.tick(1300);
    assert!(m.snapshot().player.clearing.is_empty());
}

#[test]
fn test_hold_through_the_match() {
    let mut m = running(8);
    let first = m.session(Side::Player).current().unwrap().kind;
    let next = m.session(Side::Player).next().kind;

    let events = m.apply_action(Side::Player, Action::Hold, 10);
    assert_eq!(events.as_slice(), &[MatchEvent::Moved { side: Side::Player }]);
    assert_eq!(m.session(Side::Player).hold_piece(), Some(first));
    assert_eq!(m.session(Side::Player).current().unwrap().kind, next);

    // Locked until the next merge.
    assert!(m.apply_action(Side::Player, Action::Hold, 20).is_empty());
    m.apply_action(Side::Player, Action::HardDrop, 30);
    assert!(m.session(Side::Player).can_hold());
}

#[test]
fn test_game_over_freezes_then_restart_resets() {
    let mut m = running(11);
    let mut now = 0;
    while !m.game_over() {
        m.apply_action(Side::Player, Action::HardDrop, now);
        now += 10;
        assert!(now < 100_000, "player never topped out");
    }
    assert_eq!(m.winner(), Some(Side::Opponent));
    assert!(m.session(Side::Player).topped_out());

    let frozen = m.snapshot();
    assert!(m.apply_action(Side::Opponent, Action::HardDrop, now).is_empty());
    assert!(m.tick(now + 10_000).is_empty());
    assert_eq!(m.snapshot(), frozen);

    assert_eq!(m.start(now), MatchEvent::Started { episode: 2 });
    assert_eq!(m.phase(), Phase::Running);
    assert_eq!(m.winner(), None);
    for side in [Side::Player, Side::Opponent] {
        let session = m.session(side);
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.score(), 0);
        assert!(session.current().is_some());
    }
}

#[test]
fn test_idle_player_loses_to_the_heuristic() {
    let mut m = running(7);
    let mut now = 0;
    while !m.game_over() && now <= 600_000 {
        m.tick(now);
        now += SCHEDULER_TICK_MS as u64;
    }
    assert_eq!(m.phase(), Phase::Over);
    assert_eq!(m.winner(), Some(Side::Opponent));
    assert!(m.session(Side::Opponent).pieces_merged() > 0);
}
