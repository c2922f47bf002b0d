//! Read-only view of a session for the render tick
//!
//! A snapshot holds only visible rows: row 0 is the top visible row, and
//! active-piece cells in the vanish zone are left out.

use crate::types::{BoardCell, PieceIdentity, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub cols: usize,
    pub rows: usize,
    /// Visible cells, row-major (y * cols + x)
    pub board: Vec<BoardCell>,
    /// Visible cells of the falling piece as `(x, y)`
    pub active: Vec<(usize, usize)>,
    pub active_kind: Option<PieceKind>,
    pub preview: Vec<PieceIdentity>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub playing: bool,
    pub paused: bool,
    pub game_over: bool,
    /// Waiting for the renderer to finish a clear animation
    pub suspended: bool,
    /// Rows (visible coordinates) being cleared while suspended
    pub flashing: Vec<usize>,
    /// Something changed since the previous snapshot
    pub dirty: bool,
}

impl GameSnapshot {
    /// Cell at visible coordinates, with the active piece drawn on top
    pub fn cell(&self, x: usize, y: usize) -> BoardCell {
        if x >= self.cols || y >= self.rows {
            return BoardCell::Empty;
        }
        if let Some(kind) = self.active_kind {
            if self.active.contains(&(x, y)) {
                return BoardCell::Occupied(kind);
            }
        }
        self.board[y * self.cols + x]
    }

    pub fn playable(&self) -> bool {
        self.playing && !self.suspended
    }
}
