//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{get_shape, shape_cells, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{BoardCell, PieceIdentity, PieceKind, Rotation};

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

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

/// Row-clear flash: alternates lit and dark for a fixed number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashAnimation {
    frames: u32,
    ticks_per_frame: u32,
    remaining_ticks: u32,
}

impl FlashAnimation {
    pub const DEFAULT_FRAMES: u32 = 7;

    pub fn new(frames: u32, ticks_per_frame: u32) -> Self {
        Self {
            frames,
            ticks_per_frame: ticks_per_frame.max(1),
            remaining_ticks: 0,
        }
    }

    pub fn start(&mut self) {
        self.remaining_ticks = self.frames * self.ticks_per_frame;
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ticks > 0
    }

    /// Whether flashing rows are drawn lit in the current frame
    pub fn lit(&self) -> bool {
        self.is_active() && (self.remaining_ticks - 1) / self.ticks_per_frame % 2 == 0
    }

    /// Advance one tick; returns true on the tick the animation finishes.
    pub fn advance(&mut self) -> bool {
        if self.remaining_ticks == 0 {
            return false;
        }
        self.remaining_ticks -= 1;
        self.remaining_ticks == 0
    }
}

impl Default for FlashAnimation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FRAMES, 4)
    }
}

/// A lightweight terminal renderer for the playfield and side panel.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

/// Where the playfield landed in the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer (no flash).
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_flash_into(snap, false, viewport, fb);
    }

    /// Render into an existing framebuffer.
    ///
    /// Rows listed in `snap.flashing` are drawn as solid bars when
    /// `flash_lit` is set and as empty rows otherwise.
    pub fn render_flash_into(
        &self,
        snap: &GameSnapshot,
        flash_lit: bool,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_w = snap.cols as u16 * self.cell_w;
        let board_h = snap.rows as u16 * self.cell_h;
        let frame = Frame {
            x: viewport.width.saturating_sub(board_w + 2) / 2,
            y: viewport.height.saturating_sub(board_h + 2) / 2,
            w: board_w + 2,
            h: board_h + 2,
        };

        let bg = CellStyle::new(Rgb::new(80, 80, 90), PLAYFIELD_BG);
        fb.fill_rect(frame.x + 1, frame.y + 1, board_w, board_h, ' ', bg);
        fb.draw_box(
            frame.x,
            frame.y,
            frame.w,
            frame.h,
            CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG),
        );

        // Board plus the active piece on top
        let dot = CellStyle::new(Rgb::new(90, 90, 100), PLAYFIELD_BG).dim();
        for y in 0..snap.rows {
            if snap.flashing.contains(&y) {
                self.draw_flash_row(fb, frame, y as u16, snap.cols as u16, flash_lit);
                continue;
            }
            for x in 0..snap.cols {
                match snap.cell(x, y) {
                    BoardCell::Occupied(kind) => {
                        self.fill_cell(fb, frame, x as u16, y as u16, '█', piece_style(kind))
                    }
                    BoardCell::Empty => self.fill_cell(fb, frame, x as u16, y as u16, '·', dot),
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over {
            self.draw_overlay_text(fb, frame, "GAME OVER");
        } else if snap.paused {
            self.draw_overlay_text(fb, frame, "PAUSED");
        } else if !snap.playing {
            self.draw_overlay_text(fb, frame, "READY");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, ch: char, style: CellStyle) {
        let px = frame.x + 1 + x * self.cell_w;
        let py = frame.y + 1 + y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_flash_row(&self, fb: &mut FrameBuffer, frame: Frame, y: u16, cols: u16, lit: bool) {
        let (ch, style) = if lit {
            ('█', CellStyle::new(Rgb::new(255, 255, 255), PLAYFIELD_BG).bold())
        } else {
            (' ', CellStyle::new(Rgb::new(80, 80, 90), PLAYFIELD_BG))
        };
        for x in 0..cols {
            self.fill_cell(fb, frame, x, y, ch, style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        for (name, v) in [("SCORE", snap.score), ("LEVEL", snap.level), ("ROWS", snap.lines)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), v, value);
            y = y.saturating_add(3);
        }

        if snap.preview.is_empty() {
            return;
        }
        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for identity in &snap.preview {
            if y >= viewport.height {
                break;
            }
            match identity {
                PieceIdentity::Tetromino(kind) => self.draw_mini_piece(fb, panel_x, y, *kind),
                PieceIdentity::Wildcard => {
                    fb.put_char(panel_x, y, '?', label);
                }
            }
            y = y.saturating_add(3);
        }
    }

    /// Spawn orientation at one terminal row per cell, top-aligned
    fn draw_mini_piece(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind) {
        let shape = get_shape(kind, Rotation::North);
        let top = shape_cells(shape).map(|(_, row)| row).min().unwrap_or(0);
        let style = CellStyle {
            bg: PANEL_BG,
            ..piece_style(kind)
        };
        for (col, row) in shape_cells(shape) {
            let px = x + col as u16 * self.cell_w;
            let py = y + (row - top) as u16;
            fb.fill_rect(px, py, self.cell_w, 1, '█', style);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: Frame, text: &str) {
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn piece_style(kind: PieceKind) -> CellStyle {
    let fg = match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    };
    CellStyle::new(fg, PLAYFIELD_BG).bold()
}
