//! Tris (workspace facade crate).
//!
//! Re-exports the engine and its terminal collaborators under one roof
//! (`tris::{core, input, term, types}`), plus the runner's settings and
//! leaderboard storage. The implementation lives in dedicated crates under
//! `crates/`.

pub mod settings;

pub use tris_core as core;
pub use tris_input as input;
pub use tris_term as term;
pub use tris_types as types;

pub use settings::{ScoreStore, Settings};
