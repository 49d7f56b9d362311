//! Match driver runtime.
//!
//! One tokio task owns the [`Match`]. Scheduler ticks, player actions and the
//! stop signal all arrive through a single `select!`, so every handler runs to
//! completion before the next one starts and gravity, think steps and input
//! are never interleaved mid-update.
//!
//! Once the match is over, the tick branch is disabled; only a restart or the
//! stop signal is acted on.

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::DuelConfig;
use crate::core::{Match, MatchEvents, MatchSnapshot, MovePlanner, Phase};
use crate::engine::Heuristic;
use crate::log::EventLog;
use crate::types::{Action, Side};

/// Command delivered to the match task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    Act(Action),
    Restart,
}

/// What the match task reports when it stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverReport {
    pub episodes: u32,
    pub phase: Phase,
    pub winner: Option<Side>,
    pub player_score: u64,
    pub opponent_score: u64,
    /// Records that reached the event log file.
    pub events_logged: u64,
}

/// Channels to a running match task. Must be created inside a tokio runtime.
pub struct DriverHandle {
    cmd_tx: mpsc::Sender<DriverCommand>,
    snapshot_rx: watch::Receiver<MatchSnapshot>,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<DriverReport>,
}

/// Spawn the match task with the heuristic opponent.
pub fn spawn_match(config: &DuelConfig) -> DriverHandle {
    spawn_match_with(config, Heuristic::default())
}

/// Spawn the match task with any planner for the opponent board.
pub fn spawn_match_with<P>(config: &DuelConfig, planner: P) -> DriverHandle
where
    P: MovePlanner + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(config.max_pending_actions.max(1));
    let (snapshot_tx, snapshot_rx) = watch::channel(MatchSnapshot::default());
    let (stop_tx, stop_rx) = watch::channel(false);

    let duel = Match::new(config.match_config(), planner);
    let log = EventLog::from_path(config.log_path.as_deref());
    let tick = config.tick_interval();

    let task = tokio::spawn(run_match(duel, tick, log, cmd_rx, snapshot_tx, stop_rx));

    DriverHandle {
        cmd_tx,
        snapshot_rx,
        stop_tx,
        task,
    }
}

async fn run_match<P: MovePlanner>(
    mut duel: Match<P>,
    tick: std::time::Duration,
    mut log: EventLog,
    mut cmd_rx: mpsc::Receiver<DriverCommand>,
    snapshot_tx: watch::Sender<MatchSnapshot>,
    mut stop_rx: watch::Receiver<bool>,
) -> DriverReport {
    let origin = Instant::now();
    let now_ms = || origin.elapsed().as_millis() as u64;

    let mut interval = time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let started = duel.start(now_ms());
    log.record(&started, now_ms(), duel.episode());
    snapshot_tx.send_modify(|s| duel.snapshot_into(s));

    loop {
        let mut events = MatchEvents::new();
        let running = duel.phase() == Phase::Running;

        tokio::select! {
            biased;

            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
                continue;
            }

            cmd = cmd_rx.recv() => match cmd {
                Some(DriverCommand::Act(action)) => {
                    events = duel.apply_action(Side::Player, action, now_ms());
                }
                Some(DriverCommand::Restart) => {
                    let _ = events.try_push(duel.start(now_ms()));
                    interval.reset();
                }
                None => break,
            },

            _ = interval.tick(), if running => {
                events = duel.tick(now_ms());
            }
        }

        let ts = now_ms();
        for event in &events {
            log.record(event, ts, duel.episode());
        }
        snapshot_tx.send_modify(|s| duel.snapshot_into(s));
    }

    DriverReport {
        episodes: duel.episode(),
        phase: duel.phase(),
        winner: duel.winner(),
        player_score: duel.session(Side::Player).score(),
        opponent_score: duel.session(Side::Opponent).score(),
        events_logged: log.close().await,
    }
}

impl DriverHandle {
    /// Queue a player action; false when the queue is full or the task ended.
    pub fn send(&self, action: Action) -> bool {
        self.cmd_tx.try_send(DriverCommand::Act(action)).is_ok()
    }

    pub async fn send_async(&self, action: Action) -> Result<()> {
        self.cmd_tx
            .send(DriverCommand::Act(action))
            .await
            .context("match task is gone")
    }

    pub fn restart(&self) -> bool {
        self.cmd_tx.try_send(DriverCommand::Restart).is_ok()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn snapshot_into(&self, out: &mut MatchSnapshot) {
        out.clone_from(&self.snapshot_rx.borrow());
    }

    /// A receiver that is notified after every handled tick or command.
    pub fn subscribe(&self) -> watch::Receiver<MatchSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Signal the task to stop and wait for its report.
    pub async fn stop(self) -> Result<DriverReport> {
        let _ = self.stop_tx.send(true);
        self.task.await.context("match task panicked")
    }
}

/// A match task on its own runtime, for synchronous callers such as the
/// terminal loop.
pub struct MatchDriver {
    rt: Runtime,
    handle: DriverHandle,
}

impl MatchDriver {
    pub fn start(config: &DuelConfig) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let handle = {
            let _guard = rt.enter();
            spawn_match(config)
        };
        Ok(Self { rt, handle })
    }

    pub fn send(&self, action: Action) -> bool {
        self.handle.send(action)
    }

    pub fn restart(&self) -> bool {
        self.handle.restart()
    }

    pub fn snapshot_into(&self, out: &mut MatchSnapshot) {
        self.handle.snapshot_into(out);
    }

    pub fn shutdown(self) -> Result<DriverReport> {
        let Self { rt, handle } = self;
        rt.block_on(handle.stop())
    }
}
