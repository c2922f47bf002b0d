//! Game session module - the tick-driven state machine
//!
//! [`GameSession`] coordinates the board, the bag and the score. It advances
//! only when the embedding application calls [`GameSession::update`] (one
//! simulation tick). Within a tick:
//!
//! 1. Nothing happens unless the session is playing and not suspended.
//! 2. Queued actions are applied in arrival order. Moves and rotations that
//!    would collide are dropped. A hard drop locks at once and discards the
//!    rest of the tick.
//! 3. While descending, the gravity counter advances; when it reaches the
//!    level's cadence the piece moves down one row, or starts sliding if it
//!    is grounded.
//! 4. While sliding, the lock-delay countdown runs. The piece locks when the
//!    countdown reaches zero or when its pose has not changed for
//!    `lock_motionless_frames` ticks.
//!
//! "Grounded" always means the piece would intersect one row further down.
//!
//! Locking writes the piece into the board, clears the rows it completed,
//! scores them and spawns the next piece. A spawn that intersects the board
//! ends the session.

use std::collections::VecDeque;

use anyhow::Result;
use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use crate::bag::{Bag, NextListener};
use crate::board::{Board, Occupancy};
use crate::config::SessionConfig;
use crate::events::SessionEvent;
use crate::leaderboard::LeaderboardEntry;
use crate::piece::{ActivePiece, Pose};
use crate::pieces::{spawn_column, SPAWN_ROW};
use crate::rng::Randomizer;
use crate::scoring::{gravity_frames, Score};
use crate::snapshot::GameSnapshot;
use crate::types::{GameAction, PieceIdentity, HIDDEN_ROWS, SHAPE_SIZE};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created or reset; no piece yet
    Initial,
    Playing,
    Paused,
    /// Terminal until [`GameSession::reset`]
    Ended,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Initial => "initial",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::Ended => "ended",
        }
    }
}

/// Sub-state of the falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Descending,
    /// Grounded; the lock-delay window is open
    Sliding,
}

/// Per-piece counters, cleared on every spawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    gravity: u32,
    slide: u32,
    motionless: u32,
    soft_dropped: u32,
    hard_dropped: u32,
}

#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    board: Board,
    bag: Bag,
    score: Score,
    piece: Option<ActivePiece>,
    phase: Phase,
    motion: Motion,
    suspended: bool,
    dirty: bool,
    counters: Counters,
    last_pose: Option<Pose>,
    actions: VecDeque<GameAction>,
    events: Vec<SessionEvent>,
    preview: Vec<PieceIdentity>,
    flashing: ArrayVec<usize, 4>,
    pieces_seen: u32,
}

impl GameSession {
    /// Validate `config` and build a session in the initial phase
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let board = Board::new(config.rows, config.cols)?;
        let randomizer = Randomizer::new(config.randomizer, config.use_wildcard, config.seed);
        let bag = Bag::new(randomizer, config.bag_size)?;
        let score = Score::new(config.start_level, config.max_level(), config.scoring.clone());

        Ok(Self {
            config,
            board,
            bag,
            score,
            piece: None,
            phase: Phase::Initial,
            motion: Motion::Descending,
            suspended: false,
            dirty: true,
            counters: Counters::default(),
            last_pose: None,
            actions: VecDeque::new(),
            events: Vec::new(),
            preview: Vec::new(),
            flashing: ArrayVec::new(),
            pieces_seen: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for puzzle setups
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn bag_mut(&mut self) -> &mut Bag {
        &mut self.bag
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Pieces spawned since the last reset
    pub fn pieces_seen(&self) -> u32 {
        self.pieces_seen
    }

    /// Identities reported with the most recent spawn
    pub fn preview(&self) -> &[PieceIdentity] {
        &self.preview
    }

    /// Whether the active piece would collide one row further down
    pub fn is_grounded(&self) -> bool {
        self.piece
            .map_or(false, |piece| self.board.will_intersect(&piece.shifted(0, 1)))
    }

    /// Register the bag's "next produced" callback
    pub fn set_next_listener(&mut self, listener: NextListener) {
        self.bag.set_listener(listener);
    }

    /// Buffer one external entropy value (ignored unless `use_entropy`)
    pub fn feed_entropy(&mut self, value: u32) {
        if self.config.use_entropy {
            self.bag.randomizer_mut().feed_entropy(value);
        }
    }

    /// Start the session, or pause/resume it. No effect once ended.
    pub fn toggle_play(&mut self) {
        match self.phase {
            Phase::Initial => {
                self.phase = Phase::Playing;
                info!(level = self.score.level(), seed = self.config.seed, "session started");
                self.events.push(SessionEvent::PlayingChanged { playing: true });
                self.next_piece();
            }
            Phase::Playing => {
                self.phase = Phase::Paused;
                self.actions.clear();
                self.events.push(SessionEvent::PlayingChanged { playing: false });
            }
            Phase::Paused => {
                self.phase = Phase::Playing;
                self.events.push(SessionEvent::PlayingChanged { playing: true });
            }
            Phase::Ended => return,
        }
        self.dirty = true;
    }

    /// Back to the initial phase with an empty board and a fresh score
    pub fn reset(&mut self) -> Result<()> {
        self.board.reset(self.config.rows, self.config.cols)?;
        self.bag.reset();
        self.score.reset();
        self.piece = None;
        self.phase = Phase::Initial;
        self.motion = Motion::Descending;
        self.suspended = false;
        self.counters = Counters::default();
        self.last_pose = None;
        self.actions.clear();
        self.preview.clear();
        self.flashing.clear();
        self.pieces_seen = 0;
        self.dirty = true;
        debug!("session reset");
        Ok(())
    }

    /// Freeze the session for a clear animation, or end the freeze
    pub fn set_suspended(&mut self, suspended: bool) {
        if suspended {
            self.suspended = true;
            self.dirty = true;
        } else {
            self.finish_animation();
        }
    }

    /// The renderer finished its clear animation; resume and spawn
    pub fn finish_animation(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        self.flashing.clear();
        self.dirty = true;
        if self.phase != Phase::Ended && self.piece.is_none() {
            self.next_piece();
        }
    }

    /// Queue an action for the next tick.
    ///
    /// Returns false (and drops the action) unless the session is playing and
    /// not suspended.
    pub fn queue_action(&mut self, action: GameAction) -> bool {
        if self.phase != Phase::Playing || self.suspended {
            return false;
        }
        self.actions.push_back(action);
        true
    }

    /// Take every notification emitted since the previous call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the simulation by one tick
    pub fn update(&mut self) -> Result<()> {
        if self.phase != Phase::Playing || self.suspended || self.piece.is_none() {
            return Ok(());
        }
        let cadence = gravity_frames(self.score.level(), self.config.max_speed_frames);

        while let Some(action) = self.actions.pop_front() {
            if self.apply_action(action)? {
                // The remaining input was aimed at the piece that just locked
                self.actions.clear();
                return Ok(());
            }
        }

        if self.motion == Motion::Descending {
            self.counters.gravity += 1;
            if self.counters.gravity >= cadence {
                self.counters.gravity = 0;
                self.descend();
            }
        }

        if self.motion == Motion::Sliding && self.tick_lock_delay() {
            self.lock()?;
        }

        Ok(())
    }

    /// Apply one action; returns true if it locked the piece
    fn apply_action(&mut self, action: GameAction) -> Result<bool> {
        match action {
            GameAction::MoveLeft => self.try_transform(ActivePiece::slide_left),
            GameAction::MoveRight => self.try_transform(ActivePiece::slide_right),
            GameAction::RotateCcw => self.try_transform(ActivePiece::rotate_left),
            GameAction::RotateCw => self.try_transform(ActivePiece::rotate_right),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => {
                self.hard_drop();
                self.lock()?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Commit a lateral or rotational transform if it fits
    fn try_transform(&mut self, transform: impl FnOnce(&mut ActivePiece)) {
        let Some(mut candidate) = self.piece else {
            return;
        };
        transform(&mut candidate);
        if self.board.will_intersect(&candidate) {
            return;
        }
        self.piece = Some(candidate);
        self.dirty = true;

        if self.motion == Motion::Sliding && !self.is_grounded() {
            debug!("descending");
            self.motion = Motion::Descending;
            self.counters.gravity = 0;
        }
    }

    fn descend(&mut self) {
        let Some(piece) = self.piece else {
            return;
        };
        let lower = piece.shifted(0, 1);
        if self.board.will_intersect(&lower) {
            self.start_sliding();
        } else {
            self.piece = Some(lower);
            self.dirty = true;
        }
    }

    fn soft_drop(&mut self) {
        let Some(piece) = self.piece else {
            return;
        };
        let lower = piece.shifted(0, 1);
        if !self.board.will_intersect(&lower) {
            self.piece = Some(lower);
            self.counters.soft_dropped += 1;
            self.dirty = true;
        } else if self.motion == Motion::Descending {
            self.start_sliding();
        }
    }

    fn hard_drop(&mut self) {
        let Some(mut piece) = self.piece else {
            return;
        };
        let mut rows = 0;
        loop {
            let lower = piece.shifted(0, 1);
            if self.board.will_intersect(&lower) {
                break;
            }
            piece = lower;
            rows += 1;
        }
        self.piece = Some(piece);
        self.counters.hard_dropped += rows;
        self.dirty = true;
    }

    fn start_sliding(&mut self) {
        self.motion = Motion::Sliding;
        self.counters.slide = self.config.lock_delay.frames(self.score.level());
        self.counters.motionless = 0;
        self.last_pose = self.piece.map(|piece| piece.pose());
        debug!(frames = self.counters.slide, "sliding");
    }

    /// Run one tick of the lock-delay window; true when the piece must lock
    fn tick_lock_delay(&mut self) -> bool {
        let pose = self.piece.map(|piece| piece.pose());
        if pose == self.last_pose {
            self.counters.motionless += 1;
        } else {
            self.counters.motionless = 0;
            self.last_pose = pose;
        }
        self.counters.slide = self.counters.slide.saturating_sub(1);
        self.counters.slide == 0 || self.counters.motionless >= self.config.lock_motionless_frames
    }

    fn lock(&mut self) -> Result<()> {
        let Some(piece) = self.piece.take() else {
            return Ok(());
        };
        let outcome = self.board.occupy(&piece);
        self.dirty = true;

        let Counters {
            soft_dropped,
            hard_dropped,
            ..
        } = self.counters;
        debug!(
            kind = ?piece.kind(),
            x = piece.x,
            y = piece.y,
            soft_dropped,
            hard_dropped,
            "lock"
        );
        self.events.push(SessionEvent::Locked {
            kind: piece.kind(),
            soft_dropped,
            hard_dropped,
        });

        if outcome == Occupancy::OutOfBounds {
            self.events.push(SessionEvent::OutOfBounds);
            self.end_game();
            return Ok(());
        }

        let rows = self.board.detect_filled_rows(&piece);
        if !rows.is_empty() {
            self.board.clear_rows(&rows)?;
            let update = self.score.set(rows.len() as u32, soft_dropped, hard_dropped);
            debug!(rows = rows.len(), points = update.points, "rows cleared");

            self.events.push(SessionEvent::RowsCleared { rows: rows.clone() });
            self.events.push(SessionEvent::ScoreChanged {
                total: self.score.total(),
                rows: self.score.rows(),
                level: self.score.level(),
            });
            if update.leveled_up {
                info!(level = self.score.level(), "level up");
                self.events.push(SessionEvent::LevelUp {
                    level: self.score.level(),
                });
            }

            if self.config.animate_clears {
                self.suspended = true;
                self.flashing = rows.clone();
                self.events.push(SessionEvent::Animating { rows });
                return Ok(());
            }
        }

        self.next_piece();
        Ok(())
    }

    /// Draw from the bag and place the piece at the spawn position
    fn next_piece(&mut self) {
        let identity = self.bag.next();
        let faces = match identity {
            PieceIdentity::Tetromino(kind) => [kind; 4],
            PieceIdentity::Wildcard => self.bag.randomizer_mut().wildcard_faces(),
        };
        let mut piece = ActivePiece::with_faces(
            identity,
            faces,
            spawn_column(self.board.cols()),
            SPAWN_ROW,
        );

        self.counters = Counters::default();
        self.motion = Motion::Descending;
        self.last_pose = None;
        self.pieces_seen += 1;
        self.dirty = true;
        self.preview = self.bag.preview(self.config.preview);
        debug!(piece = %identity.letter(), seen = self.pieces_seen, "spawn");
        self.events.push(SessionEvent::Spawned {
            identity,
            preview: self.preview.clone(),
        });

        if !self.board.will_intersect(&piece) {
            self.piece = Some(piece);
            return;
        }

        warn!(piece = %identity.letter(), "spawn blocked");
        // Lift until it fits with at least one cell above the field, so a
        // blocked spawn always reports out of bounds. SHAPE_SIZE rows puts
        // every cell above the field.
        let mut lifted = 0;
        while (self.board.will_intersect(&piece) || piece.cells().all(|(_, y)| y >= 0))
            && lifted < SHAPE_SIZE
        {
            piece.y -= 1;
            lifted += 1;
        }
        if self.board.occupy(&piece) == Occupancy::OutOfBounds {
            self.events.push(SessionEvent::OutOfBounds);
        }
        self.end_game();
    }

    fn end_game(&mut self) {
        self.phase = Phase::Ended;
        self.piece = None;
        self.actions.clear();
        self.dirty = true;
        let entry = LeaderboardEntry {
            total: self.score.total(),
            level: self.score.level(),
        };
        info!(
            total = entry.total,
            level = entry.level,
            pieces = self.pieces_seen,
            "game over"
        );
        self.events.push(SessionEvent::GameOver { entry });
    }

    /// Fill `out` with the render view, reusing its buffers
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.cols = self.board.cols();
        out.rows = self.board.rows();

        out.board.clear();
        for row in self.board.visible_rows() {
            out.board.extend_from_slice(row);
        }

        out.active.clear();
        out.active_kind = self.piece.map(|piece| piece.kind());
        if let Some(piece) = &self.piece {
            out.active.extend(
                piece
                    .cells()
                    .filter(|&(x, y)| x >= 0 && y >= HIDDEN_ROWS as i32)
                    .map(|(x, y)| (x as usize, y as usize - HIDDEN_ROWS)),
            );
        }

        out.preview.clear();
        out.preview.extend_from_slice(&self.preview);

        out.score = self.score.total();
        out.level = self.score.level();
        out.lines = self.score.rows();
        out.playing = self.phase == Phase::Playing;
        out.paused = self.phase == Phase::Paused;
        out.game_over = self.phase == Phase::Ended;
        out.suspended = self.suspended;

        out.flashing.clear();
        out.flashing.extend(
            self.flashing
                .iter()
                .filter(|&&row| row >= HIDDEN_ROWS)
                .map(|&row| row - HIDDEN_ROWS),
        );

        out.dirty = self.dirty;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Clear the render flag after drawing a snapshot
    pub fn mark_rendered(&mut self) {
        self.dirty = false;
    }
}
