//! Core types module - shared vocabulary for the engine and its collaborators
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the engine, the renderer and the input layer alike.
//!
//! # Playfield Dimensions
//!
//! The default playfield is 10 columns by 20 visible rows. The board keeps
//! [`HIDDEN_ROWS`] extra rows above the visible area (the vanish zone) where
//! new pieces appear partially off-screen.
//!
//! # Timing
//!
//! The engine counts time in simulation ticks ("frames"). The terminal runner
//! drives one tick every [`TICK_MS`] milliseconds.
//!
//! # Examples
//!
//! ```
//! use tris_types::{GameAction, PieceIdentity, PieceKind, Rotation};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::from_index(5), Rotation::East);
//!
//! assert_eq!(PieceIdentity::from_str("r"), Some(PieceIdentity::Wildcard));
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! ```

/// Default board width in cells
pub const DEFAULT_COLS: usize = 10;

/// Default number of visible rows
pub const DEFAULT_ROWS: usize = 20;

/// Rows kept above the visible board so new pieces can appear partially hidden
pub const HIDDEN_ROWS: usize = 2;

/// Side length of the square bounding box every piece shape is drawn in
pub const SHAPE_SIZE: usize = 4;

/// Default number of identities produced per bag refill
pub const DEFAULT_BAG_SIZE: usize = 7;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Highest starting level accepted from configuration
pub const MAX_START_LEVEL: u32 = 30;

/// Largest preview length a session will report
pub const MAX_PREVIEW: usize = 3;

/// The seven tetromino shapes
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, straight bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All seven kinds in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Position of this kind in [`PieceKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Single uppercase letter, as shown in previews and board dumps
    pub fn letter(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }
}

/// Identity of a piece handed out by the bag.
///
/// `Wildcard` is the optional eighth piece: every rotation state shows a
/// randomly chosen tetromino face, resolved when the piece spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceIdentity {
    Tetromino(PieceKind),
    Wildcard,
}

impl PieceIdentity {
    /// Parse from a single letter; `r` selects the wildcard.
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("r") {
            return Some(PieceIdentity::Wildcard);
        }
        PieceKind::from_str(s).map(PieceIdentity::Tetromino)
    }

    pub fn letter(self) -> char {
        match self {
            PieceIdentity::Tetromino(kind) => kind.letter(),
            PieceIdentity::Wildcard => 'R',
        }
    }

    pub fn is_wildcard(self) -> bool {
        matches!(self, PieceIdentity::Wildcard)
    }
}

impl From<PieceKind> for PieceIdentity {
    fn from(kind: PieceKind) -> Self {
        PieceIdentity::Tetromino(kind)
    }
}

/// The four rotation states of a piece
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: One step to the right (index 1)
/// - **South**: Two steps (index 2)
/// - **West**: Three steps to the right, or one to the left (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotation for an index, taken modulo 4
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Index in `0..4`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rotate one step to the right
    ///
    /// # Examples
    ///
    /// ```
    /// use tris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate one step to the left
    ///
    /// # Examples
    ///
    /// ```
    /// use tris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(self) -> Self {
        Self::from_index(self.index() + 3)
    }
}

/// Actions the input source can queue for the next simulation tick
///
/// The engine defines this vocabulary; key bindings live in the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate one step to the left
    RotateCcw,
    /// Rotate one step to the right
    RotateCw,
    /// Move one row down, still subject to lock delay
    SoftDrop,
    /// Drop to the lowest reachable row and lock immediately
    HardDrop,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateCcw"), Some(GameAction::RotateCcw));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotateccw" => Some(GameAction::RotateCcw),
            "rotatecw" => Some(GameAction::RotateCw),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::RotateCw => "rotateCw",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
        }
    }
}

/// A cell on the board
///
/// Occupied cells remember which shape locked them so the renderer can pick a
/// color. A wildcard piece records the face it showed when it locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoardCell {
    #[default]
    Empty,
    Occupied(PieceKind),
}

impl BoardCell {
    pub fn is_occupied(self) -> bool {
        matches!(self, BoardCell::Occupied(_))
    }

    pub fn kind(self) -> Option<PieceKind> {
        match self {
            BoardCell::Empty => None,
            BoardCell::Occupied(kind) => Some(kind),
        }
    }
}
