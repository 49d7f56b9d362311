//! DuelView: maps a [`MatchSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O), so layouts can be unit-tested. The player board sits on the
//! left and the opponent on the right, each followed by its own side panel.

use crate::core::{piece_def, MatchSnapshot, Phase, Piece, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Glyph, Rgb};
use crate::types::{Cell, Effect, PieceKind, Side, BOARD_HEIGHT, BOARD_WIDTH};

const PANEL_W: u16 = 12;
const GAP: u16 = 4;

const BLACK: Rgb = Rgb::new(0, 0, 0);
const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const GARBAGE: Rgb = Rgb::new(110, 110, 120);
const FLASH: Rgb = Rgb::new(250, 250, 250);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Two-board renderer
#[derive(Debug, Clone, Copy)]
pub struct DuelView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for DuelView {
    fn default() -> Self {
        // 2x1 compensates for the usual terminal glyph aspect ratio.
        Self { cell_w: 2, cell_h: 1 }
    }
}

/// Where one board block landed in the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoardOrigin {
    frame_x: u16,
    frame_y: u16,
}

impl DuelView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    fn frame_size(&self) -> (u16, u16) {
        (
            BOARD_WIDTH as u16 * self.cell_w + 2,
            BOARD_HEIGHT as u16 * self.cell_h + 2,
        )
    }

    /// Width of both blocks plus the gap between them
    pub fn layout_width(&self) -> u16 {
        let (frame_w, _) = self.frame_size();
        2 * (frame_w + 1 + PANEL_W) + GAP
    }

    /// Height of a board frame plus its title row
    pub fn layout_height(&self) -> u16 {
        self.frame_size().1 + 1
    }

    fn origins(&self, viewport: Viewport) -> [BoardOrigin; 2] {
        let (frame_w, _) = self.frame_size();
        let left = viewport.width.saturating_sub(self.layout_width()) / 2;
        let top = viewport.height.saturating_sub(self.layout_height()) / 2 + 1;
        let block_w = frame_w + 1 + PANEL_W + GAP;
        [
            BoardOrigin {
                frame_x: left,
                frame_y: top,
            },
            BoardOrigin {
                frame_x: left.saturating_add(block_w),
                frame_y: top,
            },
        ]
    }

    /// Render the whole match into a reusable framebuffer.
    pub fn render_into(&self, snap: &MatchSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let [left, right] = self.origins(viewport);
        self.draw_side(fb, left, Side::Player, snap.side(Side::Player));
        self.draw_side(fb, right, Side::Opponent, snap.side(Side::Opponent));

        match snap.phase {
            Phase::Over => {
                let headline = match snap.winner {
                    Some(Side::Player) => "YOU WIN",
                    Some(Side::Opponent) => "CPU WINS",
                    None => "GAME OVER",
                };
                self.draw_banner(fb, viewport, headline, "R restart  Q quit");
            }
            Phase::Idle => self.draw_banner(fb, viewport, "READY", "R start  Q quit"),
            Phase::Running => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &MatchSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_side(&self, fb: &mut FrameBuffer, at: BoardOrigin, side: Side, s: &SessionSnapshot) {
        let (frame_w, frame_h) = self.frame_size();

        let title = match side {
            Side::Player => "PLAYER",
            Side::Opponent => "CPU",
        };
        fb.put_str_centered(
            at.frame_x,
            at.frame_y.saturating_sub(1),
            frame_w,
            title,
            CellStyle::default().bold(),
        );

        let border_fg = match s.effect {
            Some(Effect::Attacked) => Rgb::new(230, 60, 60),
            Some(Effect::AttackLaunch) => Rgb::new(240, 200, 60),
            None => Rgb::new(200, 200, 200),
        };
        fb.draw_frame(at.frame_x, at.frame_y, frame_w, frame_h, CellStyle::new(border_fg, BLACK));

        for y in 0..BOARD_HEIGHT {
            let flashing = s.clearing.contains(&y);
            for x in 0..BOARD_WIDTH {
                let cell = s.board.get(x as i8, y as i8).unwrap_or_default();
                let (ch, style) = if flashing {
                    ('█', CellStyle::new(FLASH, WELL_BG).bold())
                } else {
                    board_glyph(cell)
                };
                self.fill_cell(fb, at, x as i8, y as i8, ch, style);
            }
        }

        if let (Some(active), Some(ghost_y)) = (s.active, s.ghost_y) {
            let style = CellStyle::new(kind_rgb(active.kind).scaled(1, 2), WELL_BG).dim();
            let ghost = Piece { y: ghost_y, ..active };
            self.draw_piece(fb, at, &ghost, '░', style);
        }
        if let Some(active) = s.active {
            let style = CellStyle::new(kind_rgb(active.kind), WELL_BG).bold();
            self.draw_piece(fb, at, &active, '█', style);
        }

        self.draw_panel(fb, at.frame_x + frame_w + 1, at.frame_y, s);
    }

    fn draw_piece(&self, fb: &mut FrameBuffer, at: BoardOrigin, piece: &Piece, ch: char, style: CellStyle) {
        let Some(shape) = piece.shape() else {
            return;
        };
        for &(c, r) in shape {
            self.fill_cell(fb, at, piece.x.saturating_add(c), piece.y.saturating_add(r), ch, style);
        }
    }

    /// Paint one board cell; cells outside the well are skipped.
    fn fill_cell(&self, fb: &mut FrameBuffer, at: BoardOrigin, x: i8, y: i8, ch: char, style: CellStyle) {
        if !(0..BOARD_WIDTH as i8).contains(&x) || !(0..BOARD_HEIGHT as i8).contains(&y) {
            return;
        }
        let px = at.frame_x + 1 + x as u16 * self.cell_w;
        let py = at.frame_y + 1 + y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, x: u16, top: u16, s: &SessionSnapshot) {
        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), BLACK);

        let mut y = top;
        fb.put_str(x, y, "SCORE", label);
        fb.put_u64(x, y + 1, s.score, value);
        y += 3;

        fb.put_str(x, y, "LINES", label);
        fb.put_u64(x, y + 1, s.lines as u64, value);
        y += 3;

        fb.put_str(x, y, "NEXT", label);
        draw_preview(fb, x, y + 1, s.next, value);
        y += 4;

        fb.put_str(x, y, "HOLD", label);
        match s.hold {
            Some(kind) => {
                let style = if s.can_hold { value } else { value.dim() };
                draw_preview(fb, x, y + 1, kind, style);
            }
            None => fb.put_str(x, y + 1, "-", value),
        }
        y += 4;

        fb.put_str(x, y, "QUEUE", label);
        for (i, kind) in s.queue.iter().enumerate() {
            fb.put_str(x + 2 * i as u16, y + 1, kind.as_str(), CellStyle::new(kind_rgb(*kind), BLACK));
        }

        if s.topped_out {
            fb.put_str(x, y + 3, "TOPPED OUT", CellStyle::new(Rgb::new(230, 60, 60), BLACK).bold());
        }
    }

    fn draw_banner(&self, fb: &mut FrameBuffer, viewport: Viewport, headline: &str, hint: &str) {
        let w = headline.chars().count().max(hint.chars().count()) as u16 + 4;
        let x = viewport.width.saturating_sub(w) / 2;
        let y = viewport.height.saturating_sub(4) / 2;
        let style = CellStyle::new(Rgb::new(255, 255, 255), BLACK);

        fb.fill_rect(x, y, w, 4, ' ', style);
        fb.draw_frame(x, y, w, 4, style);
        fb.put_str_centered(x, y + 1, w, headline, style.bold());
        fb.put_str_centered(x, y + 2, w, hint, style.dim());
    }
}

/// Preview a kind in orientation 0, compressed to its occupied rows.
fn draw_preview(fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind, base: CellStyle) {
    let Some(shape) = Piece::new(kind).shape() else {
        return;
    };
    let top = shape.iter().map(|&(_, r)| r).min().unwrap_or(0);
    let style = CellStyle {
        fg: kind_rgb(kind),
        ..base
    };
    for &(c, r) in shape {
        let px = x + 2 * c as u16;
        let py = y + (r - top) as u16;
        fb.put_str(px, py, "██", style);
    }
}

fn board_glyph(cell: Cell) -> (char, CellStyle) {
    match cell {
        Cell::Empty => ('·', CellStyle::new(Rgb::new(90, 90, 100), WELL_BG).dim()),
        Cell::Garbage => ('▓', CellStyle::new(GARBAGE, WELL_BG)),
        Cell::Filled(kind) => ('█', CellStyle::new(kind_rgb(kind), WELL_BG).bold()),
    }
}

/// Color for a kind, from its catalog color tag.
fn kind_rgb(kind: PieceKind) -> Rgb {
    match piece_def(kind).color_tag {
        "cyan" => Rgb::new(80, 220, 220),
        "yellow" => Rgb::new(240, 220, 80),
        "purple" => Rgb::new(200, 120, 220),
        "green" => Rgb::new(100, 220, 120),
        "red" => Rgb::new(220, 80, 80),
        "blue" => Rgb::new(80, 120, 220),
        "orange" => Rgb::new(255, 165, 0),
        _ => Rgb::new(220, 220, 220),
    }
}
