//! Piece supply - buffers randomizer output and serves it oldest-first
//!
//! The bag never runs dry: [`Bag::next`] and [`Bag::preview`] refill from the
//! randomizer whenever too few identities are buffered, one batch of `size` at
//! a time. Whatever `preview(n)` reports is exactly what the next `n` calls to
//! `next()` return, unless the bag is reset in between.

use std::collections::VecDeque;
use std::fmt;

use anyhow::{ensure, Result};
use tracing::debug;

use crate::rng::{Randomizer, RandomizerPolicy};
use crate::types::PieceIdentity;

/// Callback invoked with every identity handed out by [`Bag::next`]
pub type NextListener = Box<dyn FnMut(PieceIdentity) + Send>;

pub struct Bag {
    randomizer: Randomizer,
    size: usize,
    queue: VecDeque<PieceIdentity>,
    listener: Option<NextListener>,
}

impl fmt::Debug for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bag")
            .field("randomizer", &self.randomizer)
            .field("size", &self.size)
            .field("queue", &self.queue)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Bag {
    /// Create an empty bag that refills `size` identities at a time.
    ///
    /// Under the permutation policy the size must be a whole multiple of the
    /// randomizer's alphabet.
    pub fn new(randomizer: Randomizer, size: usize) -> Result<Self> {
        ensure!(size > 0, "bag size must be positive");
        if randomizer.policy() == RandomizerPolicy::Permutation {
            let alphabet = randomizer.alphabet().len();
            ensure!(
                size % alphabet == 0,
                "bag size {} is not a multiple of the {}-piece alphabet",
                size,
                alphabet
            );
        }
        Ok(Self {
            randomizer,
            size,
            queue: VecDeque::with_capacity(size * 2),
            listener: None,
        })
    }

    /// Batch size of each refill
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of identities currently buffered
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Register the "next produced" callback, replacing any previous one.
    pub fn set_listener(&mut self, listener: NextListener) {
        self.listener = Some(listener);
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn randomizer_mut(&mut self) -> &mut Randomizer {
        &mut self.randomizer
    }

    /// Append one freshly generated batch.
    pub fn fill(&mut self) {
        let batch = self.randomizer.generate(self.size);
        debug!(size = batch.len(), buffered = self.queue.len(), "bag refill");
        self.queue.extend(batch);
    }

    /// Queue specific identities behind whatever is already buffered
    /// (scripted openings, replays).
    pub fn extend<I: IntoIterator<Item = PieceIdentity>>(&mut self, identities: I) {
        self.queue.extend(identities);
    }

    /// Remove and return the oldest identity, refilling first if empty.
    pub fn next(&mut self) -> PieceIdentity {
        let identity = loop {
            if let Some(identity) = self.queue.pop_front() {
                break identity;
            }
            self.fill();
        };
        if let Some(listener) = self.listener.as_mut() {
            listener(identity);
        }
        identity
    }

    /// The next `n` identities in serving order, without consuming them.
    pub fn preview(&mut self, n: usize) -> Vec<PieceIdentity> {
        while self.queue.len() < n {
            self.fill();
        }
        self.queue.iter().take(n).copied().collect()
    }

    /// Discard everything buffered; the next draw generates a fresh batch.
    pub fn reset(&mut self) {
        self.queue.clear();
    }
}
