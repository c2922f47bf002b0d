//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the game rules and the tick-driven simulation. It does
//! no I/O and knows nothing about terminals or key bindings, so it can run in
//! any environment (terminal, GUI, headless tests).
//!
//! - **Deterministic**: the same configuration and seed (and the same
//!   external entropy, when enabled) produce identical games
//! - **Testable**: every rule is exercised by unit and property tests
//!
//! # Module Structure
//!
//! - [`pieces`]: the 7 tetromino shapes x 4 rotation states
//! - [`piece`]: the falling piece and its transforms
//! - [`rng`]: seeded source plus the uniform and permutation randomizers
//! - [`bag`]: buffered piece supply with preview
//! - [`board`]: the grid, collision queries, locking and row clearing
//! - [`scoring`]: points, level progression and gravity cadence
//! - [`config`]: session configuration and the lock-delay policy
//! - [`session`]: the state machine tying everything together
//! - [`snapshot`]: read-only render view
//! - [`events`]: notifications for renderer and persistence
//! - [`leaderboard`]: capped high-score table
//!
//! # Example
//!
//! ```
//! use tris_core::{GameSession, SessionConfig};
//! use tris_core::types::GameAction;
//!
//! let mut session = GameSession::new(SessionConfig::default()).unwrap();
//! session.toggle_play();
//!
//! session.queue_action(GameAction::MoveRight);
//! session.queue_action(GameAction::HardDrop);
//! session.update().unwrap();
//!
//! assert_eq!(session.pieces_seen(), 2);
//! assert_eq!(session.board().occupied_count(), 4);
//! ```
//!
//! # Timing
//!
//! Time is counted in simulation ticks. Gravity, lock delay and the
//! motionless threshold are all expressed in ticks; the embedding
//! application decides how long a tick is.

pub mod bag;
pub mod board;
pub mod config;
pub mod events;
pub mod leaderboard;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tris_types as types;

// Re-export commonly used types for convenience
pub use bag::{Bag, NextListener};
pub use board::{Board, Occupancy};
pub use config::{LockDelay, LockTier, SessionConfig};
pub use events::SessionEvent;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use piece::{ActivePiece, Pose};
pub use pieces::{get_shape, shape_cells, spawn_column, Shape, SPAWN_ROW};
pub use rng::{Randomizer, RandomizerPolicy, SimpleRng};
pub use scoring::{gravity_frames, Score, ScoreUpdate, ScoringTable};
pub use session::{GameSession, Motion, Phase};
pub use snapshot::GameSnapshot;
