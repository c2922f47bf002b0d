//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal gameplay. Views draw
//! into a plain framebuffer which the renderer flushes to the terminal,
//! sending only what changed since the previous frame.
//!
//! - [`fb`]: styled character framebuffer
//! - [`game_view`]: playfield, side panel and overlays from a `GameSnapshot`
//! - [`renderer`]: crossterm output with diffing and terminal restore

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tris_core as core;
pub use tris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{FlashAnimation, GameView, Viewport};
pub use renderer::{encode_changes, encode_frame, TerminalRenderer};
