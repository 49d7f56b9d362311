//! Duel module - the match controller
//!
//! A [`Match`] owns the player and opponent sessions and a [`Scheduler`] of
//! plain timestamps. Time only advances through the `now` arguments, so the
//! same calls replay the same match.
//!
//! Lifecycle: `Idle -> Running -> Over`, and `start` again from `Over` restarts.
//! While running, [`Match::tick`] performs, in order: flag expiry, player
//! gravity, opponent think, opponent gravity. Every handler runs to completion
//! before the next one starts, and garbage sent by one board is applied to the
//! other inside the same call.

use arrayvec::ArrayVec;

use crate::board::{Board, ClearedRows};
use crate::pieces::Piece;
use crate::session::{ControlHint, InjectGarbage, MergeReport, Placement, Session, SessionEvent};
use crate::snapshot::MatchSnapshot;
use crate::types::{
    Action, Effect, Side, CLEAR_FLASH_MS, DROP_INTERVAL_MS, EFFECT_MS, THINK_INTERVAL_MS,
};

/// Chooses a target placement for the heuristic board
///
/// Implementations only read the piece and board; the match applies the
/// decision one control step at a time.
pub trait MovePlanner {
    fn plan(&self, piece: &Piece, board: &Board) -> Option<Placement>;
}

impl<F> MovePlanner for F
where
    F: Fn(&Piece, &Board) -> Option<Placement>,
{
    fn plan(&self, piece: &Piece, board: &Board) -> Option<Placement> {
        self(piece, board)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Over,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Over => "over",
        }
    }
}

/// Match tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub player_seed: u32,
    pub opponent_seed: u32,
    pub drop_interval_ms: u32,
    pub think_interval_ms: u32,
    pub clear_flash_ms: u32,
    pub effect_ms: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::with_seed(1)
    }
}

impl MatchConfig {
    /// Default timings; the opponent's seed is derived from the player's.
    pub fn with_seed(seed: u32) -> Self {
        Self {
            player_seed: seed,
            opponent_seed: seed.wrapping_add(1),
            drop_interval_ms: DROP_INTERVAL_MS,
            think_interval_ms: THINK_INTERVAL_MS,
            clear_flash_ms: CLEAR_FLASH_MS,
            effect_ms: EFFECT_MS,
        }
    }
}

/// Per-board timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideClock {
    /// Last successful gravity step, soft drop or hard drop.
    pub last_drop_ms: u64,
    pub clear_until_ms: Option<u64>,
    pub effect_until_ms: Option<u64>,
}

/// Match-owned timestamps, advanced only by `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scheduler {
    pub player: SideClock,
    pub opponent: SideClock,
    pub last_think_ms: u64,
}

impl Scheduler {
    fn reset(&mut self, now_ms: u64) {
        *self = Self {
            player: SideClock {
                last_drop_ms: now_ms,
                ..SideClock::default()
            },
            opponent: SideClock {
                last_drop_ms: now_ms,
                ..SideClock::default()
            },
            last_think_ms: now_ms,
        };
    }

    pub fn clock(&self, side: Side) -> &SideClock {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    fn clock_mut(&mut self, side: Side) -> &mut SideClock {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }
}

/// Something observable that happened during a match call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    Started { episode: u32 },
    Moved { side: Side },
    Merged {
        side: Side,
        cleared_rows: ClearedRows,
        score_gained: u64,
        garbage_sent: u8,
    },
    GarbageApplied {
        side: Side,
        count: u8,
        truncated_rows: u8,
    },
    Thought { hint: ControlHint },
    Over { winner: Side },
}

/// Events produced by one call; a single call never produces more than this.
pub type MatchEvents = ArrayVec<MatchEvent, 8>;

/// Two boards, one scheduler
#[derive(Debug, Clone)]
pub struct Match<P> {
    config: MatchConfig,
    planner: P,
    player: Session,
    opponent: Session,
    phase: Phase,
    winner: Option<Side>,
    episode: u32,
    scheduler: Scheduler,
}

impl<P: MovePlanner> Match<P> {
    pub fn new(config: MatchConfig, planner: P) -> Self {
        Self {
            player: Session::new(config.player_seed),
            opponent: Session::new(config.opponent_seed),
            config,
            planner,
            phase: Phase::Idle,
            winner: None,
            episode: 0,
            scheduler: Scheduler::default(),
        }
    }

    /// Reset both boards and start running
    ///
    /// The first start uses the configured seeds; restarts continue from each
    /// board's RNG state so every episode deals a new sequence.
    pub fn start(&mut self, now_ms: u64) -> MatchEvent {
        let (player_seed, opponent_seed) = if self.episode == 0 {
            (self.config.player_seed, self.config.opponent_seed)
        } else {
            (self.player.seed(), self.opponent.seed())
        };
        self.player = Session::new(player_seed);
        self.opponent = Session::new(opponent_seed);
        self.phase = Phase::Running;
        self.winner = None;
        self.episode = self.episode.wrapping_add(1);
        self.scheduler.reset(now_ms);
        MatchEvent::Started {
            episode: self.episode,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn session(&self, side: Side) -> &Session {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    /// Direct session access for scripted setups
    pub fn session_mut(&mut self, side: Side) -> &mut Session {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    fn running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Apply a discrete action to one board immediately
    ///
    /// A no-op once the match is not running or the board has no active piece.
    pub fn apply_action(&mut self, side: Side, action: Action, now_ms: u64) -> MatchEvents {
        let mut events = MatchEvents::new();
        if !self.running() {
            return events;
        }

        let Some(event) = self.session_mut(side).apply_action(action) else {
            return events;
        };
        if matches!(action, Action::Down | Action::HardDrop) {
            self.scheduler.clock_mut(side).last_drop_ms = now_ms;
        }
        self.resolve(side, event, now_ms, &mut events);
        events
    }

    /// One scheduler tick: expire flags, then gravity and think in a fixed order
    pub fn tick(&mut self, now_ms: u64) -> MatchEvents {
        let mut events = MatchEvents::new();
        if !self.running() {
            return events;
        }

        self.expire_flags(now_ms);

        self.gravity_into(Side::Player, now_ms, &mut events);
        if !self.running() {
            return events;
        }

        if let Some(hint) = self.tick_think(now_ms) {
            events.push(MatchEvent::Thought { hint });
        }

        self.gravity_into(Side::Opponent, now_ms, &mut events);
        events
    }

    /// Gravity for one board if its drop interval has elapsed
    pub fn tick_gravity(&mut self, side: Side, now_ms: u64) -> MatchEvents {
        let mut events = MatchEvents::new();
        if self.running() {
            self.gravity_into(side, now_ms, &mut events);
        }
        events
    }

    fn gravity_into(&mut self, side: Side, now_ms: u64, events: &mut MatchEvents) {
        let clock = self.scheduler.clock_mut(side);
        if now_ms.saturating_sub(clock.last_drop_ms) <= self.config.drop_interval_ms as u64 {
            return;
        }
        clock.last_drop_ms = now_ms;

        if let Some(event) = self.session_mut(side).gravity_step() {
            self.resolve(side, event, now_ms, events);
        }
    }

    /// Opponent think step if its interval has elapsed
    ///
    /// Recomputes the target against the live piece and board, then takes a
    /// single control step toward it.
    pub fn tick_think(&mut self, now_ms: u64) -> Option<ControlHint> {
        if !self.running() {
            return None;
        }
        if now_ms.saturating_sub(self.scheduler.last_think_ms)
            <= self.config.think_interval_ms as u64
        {
            return None;
        }
        self.scheduler.last_think_ms = now_ms;

        let piece = self.opponent.current()?;
        let target = self.planner.plan(&piece, self.opponent.board())?;
        let step = self.opponent.step_toward(target);
        Some(ControlHint { target, step })
    }

    fn resolve(&mut self, side: Side, event: SessionEvent, now_ms: u64, events: &mut MatchEvents) {
        match event {
            SessionEvent::Moved => events.push(MatchEvent::Moved { side }),
            SessionEvent::Merged(report) => self.resolve_merge(side, report, now_ms, events),
            SessionEvent::GameOver(report) => {
                self.resolve_merge(side, report, now_ms, events);
                let winner = side.opponent();
                self.phase = Phase::Over;
                self.winner = Some(winner);
                events.push(MatchEvent::Over { winner });
            }
        }
    }

    fn resolve_merge(
        &mut self,
        side: Side,
        report: MergeReport,
        now_ms: u64,
        events: &mut MatchEvents,
    ) {
        if !report.cleared_rows.is_empty() {
            self.scheduler.clock_mut(side).clear_until_ms =
                Some(now_ms + self.config.clear_flash_ms as u64);
        }

        let garbage_sent = report.attack.map_or(0, |a| a.count);
        events.push(MatchEvent::Merged {
            side,
            cleared_rows: report.cleared_rows,
            score_gained: report.score_gained,
            garbage_sent,
        });

        if let Some(attack) = report.attack {
            events.push(self.send_garbage(side, attack, now_ms));
        }
    }

    /// Apply an attack from `from` to the other board and raise both flags
    fn send_garbage(&mut self, from: Side, attack: InjectGarbage, now_ms: u64) -> MatchEvent {
        let to = from.opponent();
        let truncated_rows = self.session_mut(to).receive_garbage(attack);

        let until = Some(now_ms + self.config.effect_ms as u64);
        self.session_mut(from).set_effect(Some(Effect::AttackLaunch));
        self.session_mut(to).set_effect(Some(Effect::Attacked));
        self.scheduler.clock_mut(from).effect_until_ms = until;
        self.scheduler.clock_mut(to).effect_until_ms = until;

        MatchEvent::GarbageApplied {
            side: to,
            count: attack.count,
            truncated_rows,
        }
    }

    fn expire_flags(&mut self, now_ms: u64) {
        for side in [Side::Player, Side::Opponent] {
            let clock = *self.scheduler.clock(side);
            if clock.clear_until_ms.is_some_and(|t| now_ms >= t) {
                self.scheduler.clock_mut(side).clear_until_ms = None;
                self.session_mut(side).clear_pending();
            }
            if clock.effect_until_ms.is_some_and(|t| now_ms >= t) {
                self.scheduler.clock_mut(side).effect_until_ms = None;
                self.session_mut(side).set_effect(None);
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut MatchSnapshot) {
        out.phase = self.phase;
        out.winner = self.winner;
        out.episode = self.episode;
        self.player.snapshot_into(&mut out.player);
        self.opponent.snapshot_into(&mut out.opponent);
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let mut s = MatchSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
