//! Scoring module - line-clear points, drop bonuses and level progression
//!
//! Points for a clear are `line_multipliers[rows - 1] * (level + 1)`, plus a
//! bonus per soft-dropped row and per hard-dropped row. The level used is the
//! one in effect before the clear. The level then goes up by one whenever the
//! cumulative row count reaches `10 * (level + 1)`, up to an optional cap.
//!
//! The level also drives gravity: [`gravity_frames`] gives the number of
//! simulation ticks between automatic one-row descents.

use serde::{Deserialize, Serialize};

/// Point values used by [`Score::set`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTable {
    /// Base points for clearing 1, 2, 3 and 4 rows at once
    pub line_multipliers: Vec<u32>,
    /// Points per row of manual soft drop
    pub soft_drop: u32,
    /// Points per row of hard drop
    pub hard_drop: u32,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            line_multipliers: vec![40, 100, 300, 800],
            soft_drop: 1,
            hard_drop: 2,
        }
    }
}

impl ScoringTable {
    /// Base points for clearing `rows` rows at once (0 for no rows)
    ///
    /// Clears larger than the table use its last entry.
    pub fn line_points(&self, rows: u32) -> u32 {
        if rows == 0 {
            return 0;
        }
        let idx = (rows as usize).min(self.line_multipliers.len());
        idx.checked_sub(1)
            .and_then(|i| self.line_multipliers.get(i))
            .copied()
            .unwrap_or(0)
    }
}

/// Running score of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    level: u32,
    rows: u32,
    total: u32,
    start_level: u32,
    max_level: Option<u32>,
    table: ScoringTable,
}

/// What a single [`Score::set`] call changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreUpdate {
    pub points: u32,
    pub leveled_up: bool,
}

impl Score {
    /// `max_level` of `None` means unlimited. The start level is clamped to
    /// the cap.
    pub fn new(start_level: u32, max_level: Option<u32>, table: ScoringTable) -> Self {
        let start_level = max_level.map_or(start_level, |cap| start_level.min(cap));
        Self {
            level: start_level,
            rows: 0,
            total: 0,
            start_level,
            max_level,
            table,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn max_level(&self) -> Option<u32> {
        self.max_level
    }

    pub fn table(&self) -> &ScoringTable {
        &self.table
    }

    /// Score a lock that cleared `rows` rows after `soft` manual soft-drop
    /// rows and `hard` hard-drop rows.
    ///
    /// Locks that clear nothing leave the score untouched.
    pub fn set(&mut self, rows: u32, soft: u32, hard: u32) -> ScoreUpdate {
        if rows == 0 {
            return ScoreUpdate::default();
        }

        let points = self
            .table
            .line_points(rows)
            .saturating_mul(self.level + 1)
            .saturating_add(soft.saturating_mul(self.table.soft_drop))
            .saturating_add(hard.saturating_mul(self.table.hard_drop));

        self.total = self.total.saturating_add(points);
        self.rows = self.rows.saturating_add(rows);

        let below_cap = self.max_level.map_or(true, |cap| self.level < cap);
        let leveled_up = below_cap && (self.level + 1) * 10 <= self.rows;
        if leveled_up {
            self.level += 1;
        }

        ScoreUpdate { points, leveled_up }
    }

    /// Back to the starting level with no rows and no points
    pub fn reset(&mut self) {
        self.level = self.start_level;
        self.rows = 0;
        self.total = 0;
    }
}

/// Simulation ticks between gravity steps at `level`.
///
/// Decreases with the level following `ceil(ln(10 - level) * 50)` and never
/// goes below `max_speed_frames`; from level 9 on it is `max_speed_frames`.
pub fn gravity_frames(level: u32, max_speed_frames: u32) -> u32 {
    let floor = max_speed_frames.max(1);
    if level >= 9 {
        return floor;
    }
    let frames = ((10.0 - level as f64).ln() * 50.0).ceil() as u32;
    frames.max(floor)
}
