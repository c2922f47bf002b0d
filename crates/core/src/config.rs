//! Session configuration
//!
//! Every field has a default, so a partial JSON object deserializes into a
//! complete configuration. [`SessionConfig::validate`] rejects values the
//! engine cannot run with; [`GameSession::new`](crate::GameSession::new) calls
//! it before building anything.

use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};

use crate::rng::RandomizerPolicy;
use crate::scoring::ScoringTable;
use crate::types::{
    DEFAULT_BAG_SIZE, DEFAULT_COLS, DEFAULT_ROWS, MAX_PREVIEW, MAX_START_LEVEL, SHAPE_SIZE,
};

/// One step of a [`LockDelay::Tiered`] policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockTier {
    pub min_level: u32,
    pub frames: u32,
}

/// How many ticks a grounded piece may keep moving before it locks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LockDelay {
    /// `max(floor, base - level)`
    LevelLinear { base: u32, floor: u32 },
    /// Frames of the last tier whose `min_level` is at or below the level,
    /// never below `floor`. Tiers are sorted by `min_level`.
    Tiered { tiers: Vec<LockTier>, floor: u32 },
}

impl Default for LockDelay {
    fn default() -> Self {
        LockDelay::LevelLinear {
            base: 60,
            floor: 10,
        }
    }
}

impl LockDelay {
    /// Lock-delay window in ticks at `level`
    pub fn frames(&self, level: u32) -> u32 {
        match self {
            LockDelay::LevelLinear { base, floor } => base.saturating_sub(level).max(*floor),
            LockDelay::Tiered { tiers, floor } => tiers
                .iter()
                .take_while(|tier| tier.min_level <= level)
                .last()
                .map_or(*floor, |tier| tier.frames.max(*floor)),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            LockDelay::LevelLinear { base, floor } => {
                ensure!(*base > 0, "lock delay base must be positive");
                ensure!(*floor > 0, "lock delay floor must be positive");
            }
            LockDelay::Tiered { tiers, floor } => {
                ensure!(!tiers.is_empty(), "tiered lock delay needs at least one tier");
                ensure!(*floor > 0, "lock delay floor must be positive");
                if tiers.windows(2).any(|w| w[0].min_level >= w[1].min_level) {
                    bail!("lock delay tiers must be sorted by increasing min_level");
                }
            }
        }
        Ok(())
    }
}

/// Everything the engine needs to run a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub rows: usize,
    pub cols: usize,
    pub start_level: u32,
    /// Highest reachable level; -1 for unlimited
    pub max_level: i32,
    pub bag_size: usize,
    pub randomizer: RandomizerPolicy,
    pub use_wildcard: bool,
    pub use_entropy: bool,
    pub seed: u32,
    /// Identities reported with each spawn (0..=3)
    pub preview: usize,
    /// Fastest gravity cadence, in ticks per row
    pub max_speed_frames: u32,
    pub lock_delay: LockDelay,
    /// Consecutive ticks without any pose change that force a lock
    pub lock_motionless_frames: u32,
    pub scoring: ScoringTable,
    /// Suspend after clears until the renderer finishes its flash
    pub animate_clears: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            start_level: 5,
            max_level: -1,
            bag_size: DEFAULT_BAG_SIZE,
            randomizer: RandomizerPolicy::Permutation,
            use_wildcard: false,
            use_entropy: false,
            seed: 12345,
            preview: 3,
            max_speed_frames: 5,
            lock_delay: LockDelay::default(),
            lock_motionless_frames: 30,
            scoring: ScoringTable::default(),
            animate_clears: true,
        }
    }
}

impl SessionConfig {
    /// Level cap, `None` when unlimited
    pub fn max_level(&self) -> Option<u32> {
        u32::try_from(self.max_level).ok()
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.rows > 0, "rows must be positive, got {}", self.rows);
        ensure!(
            self.cols >= SHAPE_SIZE,
            "cols must be at least {}, got {}",
            SHAPE_SIZE,
            self.cols
        );
        ensure!(
            self.start_level <= MAX_START_LEVEL,
            "start_level {} exceeds {}",
            self.start_level,
            MAX_START_LEVEL
        );
        ensure!(
            self.max_level >= -1,
            "max_level must be -1 (unlimited) or a level, got {}",
            self.max_level
        );
        ensure!(self.bag_size > 0, "bag_size must be positive");
        if self.randomizer == RandomizerPolicy::Permutation {
            let alphabet = 7 + usize::from(self.use_wildcard);
            ensure!(
                self.bag_size % alphabet == 0,
                "bag_size {} is not a multiple of the {}-piece alphabet",
                self.bag_size,
                alphabet
            );
        }
        ensure!(
            self.preview <= MAX_PREVIEW,
            "preview {} exceeds {}",
            self.preview,
            MAX_PREVIEW
        );
        ensure!(self.max_speed_frames > 0, "max_speed_frames must be positive");
        ensure!(
            self.lock_motionless_frames > 0,
            "lock_motionless_frames must be positive"
        );
        ensure!(
            !self.scoring.line_multipliers.is_empty(),
            "scoring needs at least one line multiplier"
        );
        self.lock_delay.validate()
    }
}
