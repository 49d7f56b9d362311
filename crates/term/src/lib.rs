//! Terminal renderer for the duel.
//!
//! Renders into a plain framebuffer instead of a widget toolkit, then flushes
//! only what changed to the terminal.
//!
//! - [`fb`]: styled glyph framebuffer
//! - [`game_view`]: pure snapshot-to-framebuffer layout of both boards
//! - [`renderer`]: crossterm output with diffing

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris_duel_core as core;
pub use tetris_duel_types as types;

pub use fb::{CellStyle, FrameBuffer, Glyph, Rgb};
pub use game_view::{DuelView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
