//! The live, falling piece.
//!
//! An [`ActivePiece`] is a pose (x, y, rotation) plus the face shown in each
//! rotation state. Regular tetrominoes show the same kind in every state; a
//! wildcard shows a face resolved at spawn for each state. Transforms never
//! check collisions; the session validates against the board and reverts.

use crate::pieces::{get_shape, shape_cells, CellOffset, Shape};
use crate::types::{PieceIdentity, PieceKind, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    identity: PieceIdentity,
    faces: [PieceKind; 4],
    pub x: i32,
    pub y: i32,
    pub rotation: Rotation,
}

/// Everything that can change about a piece from one tick to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pose {
    pub face: PieceKind,
    pub x: i32,
    pub y: i32,
    pub rotation: Rotation,
}

impl ActivePiece {
    /// A regular tetromino at the given position, in spawn orientation
    pub fn new(kind: PieceKind, x: i32, y: i32) -> Self {
        Self::with_faces(PieceIdentity::Tetromino(kind), [kind; 4], x, y)
    }

    /// A piece with an explicit face per rotation state (used for wildcards)
    pub fn with_faces(identity: PieceIdentity, faces: [PieceKind; 4], x: i32, y: i32) -> Self {
        Self {
            identity,
            faces,
            x,
            y,
            rotation: Rotation::North,
        }
    }

    pub fn identity(&self) -> PieceIdentity {
        self.identity
    }

    /// Kind shown in the current rotation state
    pub fn kind(&self) -> PieceKind {
        self.faces[self.rotation.index()]
    }

    pub fn slide_left(&mut self) {
        self.x -= 1;
    }

    pub fn slide_right(&mut self) {
        self.x += 1;
    }

    pub fn rotate_left(&mut self) {
        self.rotation = self.rotation.rotate_ccw();
    }

    pub fn rotate_right(&mut self) {
        self.rotation = self.rotation.rotate_cw();
    }

    /// Occupancy grid for the current rotation
    pub fn footprint(&self) -> &'static Shape {
        get_shape(self.kind(), self.rotation)
    }

    /// Absolute board coordinates `(x, y)` of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = CellOffset> + '_ {
        shape_cells(self.footprint()).map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Copy of this piece moved by `(dx, dy)`
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn pose(&self) -> Pose {
        Pose {
            face: self.kind(),
            x: self.x,
            y: self.y,
            rotation: self.rotation,
        }
    }
}
