//! Pieces module - the tetromino shape catalog
//!
//! Every shape is a 4x4 occupancy grid per rotation state. The grids are
//! written out visually below and parsed at compile time, so the table reads
//! the way the pieces look on screen (`#` = occupied).
//!
//! There are no wall kicks: a rotation either fits in place or is rejected.

use crate::types::{PieceKind, Rotation, SHAPE_SIZE};

/// Occupancy grid of one rotation state, indexed `[row][col]`
pub type Shape = [[bool; SHAPE_SIZE]; SHAPE_SIZE];

/// Offset of a single occupied cell relative to the bounding box origin
pub type CellOffset = (i32, i32);

const fn parse(rows: [&str; SHAPE_SIZE]) -> Shape {
    let mut out = [[false; SHAPE_SIZE]; SHAPE_SIZE];
    let mut r = 0;
    while r < SHAPE_SIZE {
        let bytes = rows[r].as_bytes();
        let mut c = 0;
        while c < SHAPE_SIZE && c < bytes.len() {
            out[r][c] = bytes[c] == b'#';
            c += 1;
        }
        r += 1;
    }
    out
}

const O: Shape = parse(["    ", " ## ", " ## ", "    "]);

/// Catalog indexed by `[PieceKind::index()][Rotation::index()]`
static CATALOG: [[Shape; 4]; 7] = [
    // I
    [
        parse(["    ", "####", "    ", "    "]),
        parse(["  # ", "  # ", "  # ", "  # "]),
        parse(["    ", "    ", "####", "    "]),
        parse([" #  ", " #  ", " #  ", " #  "]),
    ],
    // O
    [O, O, O, O],
    // T
    [
        parse([" #  ", "### ", "    ", "    "]),
        parse([" #  ", " ## ", " #  ", "    "]),
        parse(["    ", "### ", " #  ", "    "]),
        parse([" #  ", "##  ", " #  ", "    "]),
    ],
    // S
    [
        parse([" ## ", "##  ", "    ", "    "]),
        parse(["    ", " #  ", " ## ", "  # "]),
        parse(["    ", " ## ", "##  ", "    "]),
        parse(["#   ", "##  ", " #  ", "    "]),
    ],
    // Z
    [
        parse(["##  ", " ## ", "    ", "    "]),
        parse(["  # ", " ## ", " #  ", "    "]),
        parse(["    ", "##  ", " ## ", "    "]),
        parse([" #  ", "##  ", "#   ", "    "]),
    ],
    // J
    [
        parse(["#   ", "### ", "    ", "    "]),
        parse([" ## ", " #  ", " #  ", "    "]),
        parse(["    ", "### ", "  # ", "    "]),
        parse([" #  ", " #  ", "##  ", "    "]),
    ],
    // L
    [
        parse(["  # ", "### ", "    ", "    "]),
        parse([" #  ", " #  ", " ## ", "    "]),
        parse(["    ", "### ", "#   ", "    "]),
        parse(["##  ", " #  ", " #  ", "    "]),
    ],
];

/// Get the occupancy grid for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> &'static Shape {
    &CATALOG[kind.index()][rotation.index()]
}

/// Iterate the occupied cells of a shape as `(col, row)` offsets
pub fn shape_cells(shape: &Shape) -> impl Iterator<Item = CellOffset> + '_ {
    shape.iter().enumerate().flat_map(|(row, cols)| {
        cols.iter()
            .enumerate()
            .filter(|(_, &filled)| filled)
            .map(move |(col, _)| (col as i32, row as i32))
    })
}

/// Column that centers the shape bounding box on a board of `cols` columns
pub fn spawn_column(cols: usize) -> i32 {
    (cols as i32 - SHAPE_SIZE as i32) / 2
}

/// Row new pieces spawn at (top of the hidden rows)
pub const SPAWN_ROW: i32 = 0;
