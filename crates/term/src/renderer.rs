//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are diffed against the previous one and only changed runs are
//! re-emitted; a size change or [`TerminalRenderer::invalidate`] forces a full
//! redraw.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Glyph, Rgb};

/// Owns stdout and the last frame drawn to it.
pub struct TerminalRenderer {
    stdout: io::Stdout,
    shown: Option<FrameBuffer>,
    scratch: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            scratch: Vec::with_capacity(64 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.scratch.clear();
        queue_screen(&mut self.scratch, true)?;
        self.write_scratch().context("switch to alternate screen")
    }

    /// Undo [`enter`](Self::enter); safe to call after a failed frame.
    pub fn exit(&mut self) -> Result<()> {
        self.scratch.clear();
        queue_screen(&mut self.scratch, false)?;
        self.write_scratch().context("leave alternate screen")?;
        terminal::disable_raw_mode().context("disable raw mode")
    }

    /// Force the next draw to be a full redraw (terminal resize).
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Draw `fb`, then swap it with the previous frame.
    ///
    /// Callers keep one framebuffer and pass it in every frame; after the call
    /// it holds the stale frame and is ready to be re-rendered into.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.scratch.clear();
        let mut stale = match self.shown.take() {
            Some(shown) if shown.width() == fb.width() && shown.height() == fb.height() => {
                encode_diff_into(&shown, fb, &mut self.scratch)?;
                shown
            }
            other => {
                encode_full_into(fb, &mut self.scratch)?;
                let mut reuse = other.unwrap_or_else(|| FrameBuffer::new(0, 0));
                reuse.resize(fb.width(), fb.height());
                reuse
            }
        };
        self.write_scratch()?;

        std::mem::swap(&mut stale, fb);
        self.shown = Some(stale);
        Ok(())
    }

    fn write_scratch(&mut self) -> Result<()> {
        let mut lock = self.stdout.lock();
        lock.write_all(&self.scratch)?;
        lock.flush()?;
        Ok(())
    }
}

fn queue_screen(out: &mut Vec<u8>, entering: bool) -> Result<()> {
    if entering {
        out.queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
    } else {
        queue_reset(out)?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
    }
    Ok(())
}

fn queue_reset(out: &mut Vec<u8>) -> Result<&mut Vec<u8>> {
    out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
    Ok(out)
}

/// Prints glyphs, emitting style changes only when the style differs.
#[derive(Default)]
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn print(&mut self, out: &mut Vec<u8>, glyph: Glyph) -> Result<()> {
        if self.style != Some(glyph.style) {
            queue_style(out, glyph.style)?;
            self.style = Some(glyph.style);
        }
        out.queue(Print(glyph.ch))?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out` without touching stdout.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?
        .queue(cursor::MoveTo(0, 0))?;

    let mut pen = Pen::default();
    for y in 0..fb.height() {
        if y > 0 {
            out.queue(Print("\r\n"))?;
        }
        for x in 0..fb.width() {
            pen.print(out, fb.get(x, y).unwrap_or_default())?;
        }
    }

    queue_reset(out)?;
    Ok(())
}

/// Encode only the changed runs between two equally sized frames into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::default();
    for (x, y, len) in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(x, y))?;
        for gx in x..x + len {
            pen.print(out, next.get(gx, y).unwrap_or_default())?;
        }
    }

    queue_reset(out)?;
    Ok(())
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    let Rgb { r, g, b } = style.fg;
    out.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
    let Rgb { r, g, b } = style.bg;
    out.queue(SetBackgroundColor(Color::Rgb { r, g, b }))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

/// Horizontal runs of differing glyphs as `(x, y, len)`
///
/// Frames of different sizes are reported as whole rows of `next`.
fn changed_runs<'a>(
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
) -> impl Iterator<Item = (u16, u16, u16)> + 'a {
    let resized = prev.width() != next.width() || prev.height() != next.height();
    let w = next.width();

    (0..next.height()).flat_map(move |y| {
        let mut runs = Vec::new();
        if resized {
            runs.push((0, y, w));
            return runs;
        }

        let differs = |x: u16| prev.get(x, y) != next.get(x, y);
        let mut x = 0;
        while x < w {
            if !differs(x) {
                x += 1;
                continue;
            }
            let start = x;
            while x < w && differs(x) {
                x += 1;
            }
            runs.push((start, y, x - start));
        }
        runs
    })
}
