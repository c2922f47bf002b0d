//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into the engine's
//! [`GameAction`](crate::types::GameAction) vocabulary plus the session
//! commands the runner handles itself (start/pause, new game). Bindings come
//! from [`Controls`], which is part of the persisted settings.

pub mod map;

pub use tris_types as types;

pub use map::{should_quit, Controls, InputCommand, KeyMap};
