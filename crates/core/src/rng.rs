//! RNG module - piece sequence generation
//!
//! Two interchangeable policies produce batches of piece identities:
//!
//! - **Uniform**: every draw picks any identity of the alphabet with equal
//!   probability.
//! - **Permutation** ("Random Generator"): each batch deals the whole alphabet
//!   (or a whole multiple of it) in an unbiased random order, built by
//!   repeatedly picking a random element from what remains.
//!
//! Under both policies a drawn wildcard is only accepted one time in three,
//! which keeps it rarer than the regular shapes.
//!
//! The default source is a small seeded LCG, so identical seeds give identical
//! games. An optional external entropy stream (for example key-press
//! timestamps) replaces the LCG for index picks once enough values are
//! buffered.

use serde::{Deserialize, Serialize};

use crate::types::{PieceIdentity, PieceKind};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits of the state; the low bits of an LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (restarting from it replays the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Piece-supply policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RandomizerPolicy {
    Uniform,
    #[default]
    Permutation,
}

/// Produces batches of piece identities under a [`RandomizerPolicy`]
#[derive(Debug, Clone)]
pub struct Randomizer {
    policy: RandomizerPolicy,
    alphabet: Vec<PieceIdentity>,
    rng: SimpleRng,
    seed: u32,
    entropy: Vec<u32>,
}

impl Randomizer {
    /// Create a randomizer over the seven tetrominoes, plus the wildcard when
    /// `use_wildcard` is set.
    pub fn new(policy: RandomizerPolicy, use_wildcard: bool, seed: u32) -> Self {
        let mut alphabet: Vec<PieceIdentity> =
            PieceKind::ALL.iter().copied().map(PieceIdentity::from).collect();
        if use_wildcard {
            alphabet.push(PieceIdentity::Wildcard);
        }
        Self {
            policy,
            alphabet,
            rng: SimpleRng::new(seed),
            seed,
            entropy: Vec::new(),
        }
    }

    pub fn policy(&self) -> RandomizerPolicy {
        self.policy
    }

    pub fn alphabet(&self) -> &[PieceIdentity] {
        &self.alphabet
    }

    /// Buffer one externally supplied entropy value.
    pub fn feed_entropy(&mut self, value: u32) {
        self.entropy.push(value);
    }

    /// Number of buffered entropy values not yet consumed.
    pub fn entropy_len(&self) -> usize {
        self.entropy.len()
    }

    /// Restart the sequence from the original seed and drop buffered entropy.
    pub fn reset(&mut self) {
        self.rng = SimpleRng::new(self.seed);
        self.entropy.clear();
    }

    /// Produce one batch of `size` identities.
    pub fn generate(&mut self, size: usize) -> Vec<PieceIdentity> {
        match self.policy {
            RandomizerPolicy::Uniform => self.generate_uniform(size),
            RandomizerPolicy::Permutation => self.generate_permutation(size),
        }
    }

    fn generate_uniform(&mut self, size: usize) -> Vec<PieceIdentity> {
        let mut out = Vec::with_capacity(size);
        while out.len() < size {
            let idx = self.pick_index(self.alphabet.len(), size);
            let candidate = self.alphabet[idx];
            if self.accept(candidate) {
                out.push(candidate);
            }
        }
        out
    }

    fn generate_permutation(&mut self, size: usize) -> Vec<PieceIdentity> {
        // Whole copies of the alphabet; a short final copy yields a partial
        // permutation when size is not a multiple of the alphabet.
        let mut pool: Vec<PieceIdentity> =
            self.alphabet.iter().copied().cycle().take(size).collect();
        let mut out = Vec::with_capacity(size);

        while !pool.is_empty() {
            let idx = loop {
                let idx = self.pick_index(pool.len(), size);
                if self.accept(pool[idx]) {
                    break idx;
                }
            };
            out.push(pool.swap_remove(idx));
        }

        out
    }

    /// Index in `0..choices`, from entropy when at least `size` values are
    /// buffered, otherwise from the seeded source.
    fn pick_index(&mut self, choices: usize, size: usize) -> usize {
        if self.entropy.len() >= size {
            if let Some(value) = self.entropy.pop() {
                return value as usize % choices;
            }
        }
        self.rng.next_range(choices as u32) as usize
    }

    fn accept(&mut self, candidate: PieceIdentity) -> bool {
        !candidate.is_wildcard() || self.rng.next_range(3) == 2
    }

    /// Draw a regular tetromino uniformly (wildcard faces).
    pub fn draw_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.next_range(PieceKind::ALL.len() as u32) as usize]
    }

    /// Resolve the face shown in each rotation state of a wildcard piece.
    pub fn wildcard_faces(&mut self) -> [PieceKind; 4] {
        [
            self.draw_kind(),
            self.draw_kind(),
            self.draw_kind(),
            self.draw_kind(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(batch: &[PieceIdentity], id: PieceIdentity) -> usize {
        batch.iter().filter(|&&p| p == id).count()
    }

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(3) < 3);
        }
    }

    #[test]
    fn test_permutation_batch_deals_each_kind_once() {
        let mut r = Randomizer::new(RandomizerPolicy::Permutation, false, 1);
        for _ in 0..20 {
            let batch = r.generate(7);
            assert_eq!(batch.len(), 7);
            for kind in PieceKind::ALL {
                assert_eq!(count(&batch, kind.into()), 1, "{:?} in {:?}", kind, batch);
            }
        }
    }

    #[test]
    fn test_permutation_double_batch_deals_each_kind_twice() {
        let mut r = Randomizer::new(RandomizerPolicy::Permutation, false, 99);
        let batch = r.generate(14);
        for kind in PieceKind::ALL {
            assert_eq!(count(&batch, kind.into()), 2);
        }
    }

    #[test]
    fn test_permutation_with_wildcard_includes_it_once() {
        let mut r = Randomizer::new(RandomizerPolicy::Permutation, true, 3);
        let batch = r.generate(8);
        assert_eq!(count(&batch, PieceIdentity::Wildcard), 1);
    }

    #[test]
    fn test_uniform_produces_requested_size() {
        let mut r = Randomizer::new(RandomizerPolicy::Uniform, false, 5);
        assert_eq!(r.generate(7).len(), 7);
        assert_eq!(r.generate(3).len(), 3);
    }

    #[test]
    fn test_uniform_wildcard_is_rarer() {
        let mut r = Randomizer::new(RandomizerPolicy::Uniform, true, 11);
        let batch = r.generate(8000);
        let wild = count(&batch, PieceIdentity::Wildcard);
        let t = count(&batch, PieceKind::T.into());
        assert!(wild * 2 < t, "wildcard {} vs T {}", wild, t);
    }

    #[test]
    fn test_entropy_makes_output_reproducible() {
        // Entropy is used while at least `size` values remain, so a batch
        // of 7 drawn entirely from it needs 7 + 6 values.
        let stamps = [17u32, 4, 250, 9, 33, 12, 8, 1000, 3, 71, 5, 640, 22];
        let mut a = Randomizer::new(RandomizerPolicy::Permutation, false, 1);
        let mut b = Randomizer::new(RandomizerPolicy::Permutation, false, 2);
        for s in stamps {
            a.feed_entropy(s);
            b.feed_entropy(s);
        }
        // Different seeds, same entropy
        assert_eq!(a.generate(7), b.generate(7));
        assert_eq!(a.entropy_len(), 6);
        assert_eq!(b.entropy_len(), 6);
    }

    #[test]
    fn test_short_entropy_is_ignored() {
        let mut r = Randomizer::new(RandomizerPolicy::Permutation, false, 1);
        r.feed_entropy(1);
        r.feed_entropy(2);
        let _ = r.generate(7);
        assert_eq!(r.entropy_len(), 2);
    }

    #[test]
    fn test_reset_replays_sequence() {
        let mut r = Randomizer::new(RandomizerPolicy::Uniform, false, 42);
        let first = r.generate(7);
        r.reset();
        assert_eq!(r.generate(7), first);
    }
}
