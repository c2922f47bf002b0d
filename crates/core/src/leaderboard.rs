//! Capped high-score table
//!
//! A plain value object: the session reports finished games as
//! [`LeaderboardEntry`] values and the embedding application decides where
//! the table is stored.

use serde::{Deserialize, Serialize};

/// Default number of entries kept
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub total: u32,
    pub level: u32,
}

/// Entries ordered by total descending, then level descending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    capacity: usize,
    entries: Vec<LeaderboardEntry>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert an entry and return its rank (0 = best).
    ///
    /// Returns `None` when the entry duplicates an existing one or does not
    /// make the table.
    pub fn record(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let mut rank = self.entries.len();
        for (i, existing) in self.entries.iter().enumerate() {
            if *existing == entry {
                return None;
            }
            let better = entry.total > existing.total
                || (entry.total == existing.total && entry.level > existing.level);
            if better {
                rank = i;
                break;
            }
        }
        if rank >= self.capacity {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    /// Whether the entry would make the table, without inserting it
    pub fn qualifies(&self, entry: LeaderboardEntry) -> bool {
        self.clone().record(entry).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(total: u32, level: u32) -> LeaderboardEntry {
        LeaderboardEntry { total, level }
    }

    #[test]
    fn test_ordering() {
        let mut board = Leaderboard::new(5);
        assert_eq!(board.record(entry(100, 1)), Some(0));
        assert_eq!(board.record(entry(300, 2)), Some(0));
        assert_eq!(board.record(entry(100, 4)), Some(1));
        assert_eq!(board.record(entry(50, 0)), Some(3));
        assert_eq!(
            board.entries(),
            &[entry(300, 2), entry(100, 4), entry(100, 1), entry(50, 0)]
        );
    }

    #[test]
    fn test_duplicates_discarded() {
        let mut board = Leaderboard::new(5);
        board.record(entry(100, 1));
        assert_eq!(board.record(entry(100, 1)), None);
        assert_eq!(board.entries().len(), 1);
    }

    #[test]
    fn test_capacity() {
        let mut board = Leaderboard::new(3);
        for total in [10, 20, 30] {
            board.record(entry(total, 0));
        }
        assert_eq!(board.record(entry(5, 0)), None);
        assert!(!board.qualifies(entry(1, 0)));
        assert_eq!(board.record(entry(25, 0)), Some(1));
        assert_eq!(board.entries(), &[entry(30, 0), entry(25, 0), entry(20, 0)]);
    }

    #[test]
    fn test_serde_roundtrip_keeps_order() {
        let mut board = Leaderboard::default();
        board.record(entry(40, 5));
        board.record(entry(80, 6));
        let json = serde_json::to_string(&board).unwrap();
        let back: Leaderboard = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert_eq!(back.capacity(), DEFAULT_CAPACITY);
    }
}
