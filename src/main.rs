//! Terminal duel runner (default binary).
//!
//! The match runs on the adapter's scheduler task; this loop only forwards
//! key presses and draws the latest snapshot. Lifecycle lines are printed
//! after the terminal is restored.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tetris_duel::adapter::{DriverReport, DuelConfig, MatchDriver};
use tetris_duel::core::MatchSnapshot;
use tetris_duel::input::{handle_key_event, is_restart, should_quit};
use tetris_duel::term::{DuelView, FrameBuffer, TerminalRenderer, Viewport};

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    let config = DuelConfig::from_env();
    let driver = MatchDriver::start(&config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = run(&mut term, &driver);

    // Always try to restore terminal state.
    let _ = term.exit();

    let report = driver.shutdown()?;
    print_report(&config, &report);
    result
}

fn run(term: &mut TerminalRenderer, driver: &MatchDriver) -> Result<()> {
    let view = DuelView::default();
    let mut snapshot = MatchSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        driver.snapshot_into(&mut snapshot);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snapshot, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        if !event::poll(FRAME)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                if is_restart(key) {
                    if !snapshot.playable() {
                        driver.restart();
                    }
                } else if let Some(action) = handle_key_event(key) {
                    driver.send(action);
                }
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }
}

fn print_report(config: &DuelConfig, report: &DriverReport) {
    let outcome = match report.winner {
        Some(side) => format!("winner {}", side.as_str()),
        None => format!("stopped while {}", report.phase.as_str()),
    };
    eprintln!(
        "[Match] {} episode(s) played, last {}: player {} / opponent {}",
        report.episodes, outcome, report.player_score, report.opponent_score
    );
    if let Some(path) = &config.log_path {
        eprintln!("[Adapter] {} event(s) written to {}", report.events_logged, path);
    }
}
