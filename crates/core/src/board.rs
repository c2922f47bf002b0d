//! Board module - manages the playfield grid
//!
//! The board is `rows + 2` by `cols` cells: the two extra rows at the top form
//! the hidden vanish zone where new pieces appear. Cells are stored in a flat
//! row-major vector for cache locality; the grid is only reallocated on
//! [`Board::reset`].
//!
//! Coordinates are field coordinates: `(x, y)` with x in `0..cols` (left to
//! right) and y in `0..rows + 2` (top to bottom, hidden rows first). A piece
//! cell with y < 0 lies above the field. It never collides on its own, but it
//! cannot be written into the grid either.

use anyhow::{ensure, Result};
use arrayvec::ArrayVec;

use crate::piece::ActivePiece;
use crate::types::{BoardCell, HIDDEN_ROWS};

/// Outcome of writing a piece into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    /// Every cell landed inside the field
    Placed,
    /// At least one cell was above the field and was dropped
    OutOfBounds,
}

/// The game board - `cols` columns by `rows + 2` rows, flat storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<BoardCell>,
}

impl Board {
    /// Create an empty board with `rows` visible rows and `cols` columns
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let mut board = Self {
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        board.reset(rows, cols)?;
        Ok(board)
    }

    /// Reallocate the grid with new dimensions and clear it
    pub fn reset(&mut self, rows: usize, cols: usize) -> Result<()> {
        ensure!(rows > 0, "board needs at least one row, got {}", rows);
        ensure!(cols > 0, "board needs at least one column, got {}", cols);
        self.rows = rows;
        self.cols = cols;
        self.cells.clear();
        self.cells.resize((rows + HIDDEN_ROWS) * cols, BoardCell::Empty);
        Ok(())
    }

    /// Empty every cell, keeping the dimensions
    pub fn clear(&mut self) {
        self.cells.fill(BoardCell::Empty);
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of visible rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total rows including the hidden vanish zone
    pub fn height(&self) -> usize {
        self.rows + HIDDEN_ROWS
    }

    /// Calculate flat index from (x, y) field coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.cols as i32 || y < 0 || y >= self.height() as i32 {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<BoardCell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: BoardCell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(BoardCell::Occupied(_)))
    }

    /// Whether a single cell would collide: off either side, at or below the
    /// floor, or on an occupied cell. Cells above the field never collide.
    pub fn cell_collides(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.cols as i32 || y >= self.height() as i32 {
            return true;
        }
        y >= 0 && self.is_occupied(x, y)
    }

    /// Check whether any cell of `piece` collides at its current pose
    pub fn will_intersect(&self, piece: &ActivePiece) -> bool {
        piece.cells().any(|(x, y)| self.cell_collides(x, y))
    }

    /// Write the piece's face into every cell of its footprint.
    ///
    /// Cells above the field are skipped and reported as
    /// [`Occupancy::OutOfBounds`].
    pub fn occupy(&mut self, piece: &ActivePiece) -> Occupancy {
        let cell = BoardCell::Occupied(piece.kind());
        let mut outcome = Occupancy::Placed;
        for (x, y) in piece.cells() {
            if y < 0 {
                outcome = Occupancy::OutOfBounds;
                continue;
            }
            self.set(x, y, cell);
        }
        outcome
    }

    /// Check if a row is completely filled
    pub fn is_row_filled(&self, y: usize) -> bool {
        self.row(y)
            .map_or(false, |row| row.iter().all(|cell| cell.is_occupied()))
    }

    /// Filled rows among those the piece covers, top to bottom
    pub fn detect_filled_rows(&self, piece: &ActivePiece) -> ArrayVec<usize, 4> {
        let mut rows: ArrayVec<usize, 4> = ArrayVec::new();
        for (_, y) in piece.cells() {
            if y < 0 {
                continue;
            }
            let y = y as usize;
            if !rows.contains(&y) && self.is_row_filled(y) {
                rows.push(y);
            }
        }
        rows.sort_unstable();
        rows
    }

    /// Remove the given rows and shift everything above them down.
    ///
    /// Indices may arrive in any order and may repeat. Returns the number of
    /// distinct rows removed.
    pub fn clear_rows(&mut self, rows: &[usize]) -> Result<usize> {
        ensure!(!rows.is_empty(), "clear_rows called with no rows");
        let height = self.height();
        let mut doomed: Vec<usize> = rows.to_vec();
        doomed.sort_unstable();
        doomed.dedup();
        if let Some(&last) = doomed.last() {
            ensure!(
                last < height,
                "row {} is outside the board (height {})",
                last,
                height
            );
        }

        let width = self.cols;
        let mut write_y = height;

        // Scan from bottom to top
        for read_y in (0..height).rev() {
            if doomed.binary_search(&read_y).is_ok() {
                continue;
            }
            // Survivor: move it down to the write position
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        // Fresh empty rows at the top
        self.cells[..write_y * width].fill(BoardCell::Empty);

        Ok(doomed.len())
    }

    /// One row of cells (field coordinates), `None` below the floor
    pub fn row(&self, y: usize) -> Option<&[BoardCell]> {
        let start = y.checked_mul(self.cols)?;
        self.cells.get(start..start.checked_add(self.cols)?)
    }

    /// The visible rows, top to bottom, skipping the vanish zone
    pub fn visible_rows(&self) -> impl Iterator<Item = &[BoardCell]> + '_ {
        self.cells[HIDDEN_ROWS * self.cols..].chunks_exact(self.cols)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[BoardCell] {
        &self.cells
    }

    /// Count of occupied cells anywhere in the field
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }
}
