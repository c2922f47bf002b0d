//! Notifications emitted by [`GameSession`](crate::GameSession)
//!
//! The session queues events while it runs; collaborators (renderer,
//! persistence, preview) pull them with
//! [`GameSession::drain_events`](crate::GameSession::drain_events) after each
//! tick.

use arrayvec::ArrayVec;

use crate::leaderboard::LeaderboardEntry;
use crate::types::{PieceIdentity, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session started, paused or resumed
    PlayingChanged { playing: bool },
    /// A new piece entered the field
    Spawned {
        identity: PieceIdentity,
        preview: Vec<PieceIdentity>,
    },
    /// The active piece was written into the board
    Locked {
        kind: PieceKind,
        soft_dropped: u32,
        hard_dropped: u32,
    },
    /// Rows removed by the last lock, field coordinates, top to bottom
    RowsCleared { rows: ArrayVec<usize, 4> },
    ScoreChanged { total: u32, rows: u32, level: u32 },
    LevelUp { level: u32 },
    /// The renderer should play its clear animation for these rows, then call
    /// [`GameSession::finish_animation`](crate::GameSession::finish_animation)
    Animating { rows: ArrayVec<usize, 4> },
    /// A lock wrote cells above the field
    OutOfBounds,
    /// The session ended; `entry` is what a leaderboard would record
    GameOver { entry: LeaderboardEntry },
}

impl SessionEvent {
    /// Short name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEvent::PlayingChanged { .. } => "playing_changed",
            SessionEvent::Spawned { .. } => "spawned",
            SessionEvent::Locked { .. } => "locked",
            SessionEvent::RowsCleared { .. } => "rows_cleared",
            SessionEvent::ScoreChanged { .. } => "score_changed",
            SessionEvent::LevelUp { .. } => "level_up",
            SessionEvent::Animating { .. } => "animating",
            SessionEvent::OutOfBounds => "out_of_bounds",
            SessionEvent::GameOver { .. } => "game_over",
        }
    }
}
