/// Transposition table: direct-mapped, depth-preferred replacement.
/// Owned by one search context and cleared at the start of every decision.

use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Fail-high: the true score is at least the stored one.
    Lower,
    /// Fail-low: the true score is at most the stored one.
    Upper,
}

#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    pub key: u64,
    pub depth: i32,
    pub bound: Bound,
    pub score: i32,
    pub best: Option<Move>,
}

/// Probe outcome: a move hint, plus a score when the entry settles the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtHit {
    pub best: Option<Move>,
    pub score: Option<i32>,
}

pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    mask: usize,
}

impl TranspositionTable {
    pub fn new(size_log2: u32) -> Self {
        let size = 1usize << size_log2.clamp(4, 26);
        Self {
            entries: vec![None; size],
            mask: size - 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    #[inline(always)]
    fn slot(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Looks up `key`. A stored key that differs is a miss.
    #[inline]
    pub fn probe(&self, key: u64, depth: i32, alpha: i32, beta: i32) -> Option<TtHit> {
        let entry = self.entries[self.slot(key)].filter(|e| e.key == key)?;
        let usable = entry.depth >= depth
            && match entry.bound {
                Bound::Exact => true,
                Bound::Lower => entry.score >= beta,
                Bound::Upper => entry.score <= alpha,
            };
        Some(TtHit {
            best: entry.best,
            score: usable.then_some(entry.score),
        })
    }

    /// Replaces an empty slot, the same position, or a shallower entry.
    #[inline]
    pub fn store(&mut self, key: u64, depth: i32, bound: Bound, score: i32, best: Option<Move>) {
        let idx = self.slot(key);
        let replace = match &self.entries[idx] {
            None => true,
            Some(e) => e.key == key || depth >= e.depth,
        };
        if replace {
            self.entries[idx] = Some(TtEntry { key, depth, bound, score, best });
        }
    }

    pub fn get(&self, key: u64) -> Option<TtEntry> {
        self.entries[self.slot(key)].filter(|e| e.key == key)
    }
}
